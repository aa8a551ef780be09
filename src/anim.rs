/// Frame counter for a looping sprite sheet. The core only counts frames;
/// mapping the index onto an image is the renderer's job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimState {
    pub frame: u32,
    /// Seconds since the last frame change.
    pub elapsed: f32,
    pub frame_count: u32,
}

impl AnimState {
    pub fn new(frame_count: u32) -> Self {
        Self {
            frame: 0,
            elapsed: 0.0,
            frame_count: frame_count.max(1),
        }
    }

    pub fn starting_at(frame: u32, frame_count: u32) -> Self {
        let mut anim = Self::new(frame_count);
        anim.frame = frame % anim.frame_count;
        anim
    }

    /// Accumulate `dt`; step one frame once more than `interval` has passed.
    pub fn advance(&mut self, dt: f32, interval: f32) {
        self.elapsed += dt;
        if self.elapsed > interval {
            self.elapsed = 0.0;
            self.frame = (self.frame + 1) % self.frame_count;
        }
    }

    /// Standing pose.
    pub fn rest(&mut self) {
        self.frame = 0;
    }
}
