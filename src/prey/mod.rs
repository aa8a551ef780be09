pub mod roam;
pub mod spawn;

use glam::Vec2;

use crate::anim::AnimState;
use crate::config::SimConfig;
use crate::ecs::components::{Body, Ensnared, Heading, Position, PreyId, Roam};
use crate::kinematics::Viewport;

/// Nearest-prey query result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub id: PreyId,
    pub pos: Vec2,
    pub dist: f32,
}

/// What a renderer needs to draw one prey.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreyPose {
    pub id: PreyId,
    pub pos: Vec2,
    pub heading: f32,
    pub size: f32,
    pub frame: u32,
    pub ensnared: bool,
}

/// Owns every live prey, their spawn schedule and their ids.
pub struct Population {
    world: hecs::World,
    next_id: u64,
    next_spawn_at: f64,
}

impl Population {
    /// Empty population whose first batch is due at `first_spawn_at`.
    pub fn new(first_spawn_at: f64) -> Self {
        Self {
            world: hecs::World::new(),
            next_id: 1,
            next_spawn_at: first_spawn_at,
        }
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    pub fn next_spawn_at(&self) -> f64 {
        self.next_spawn_at
    }

    pub fn spawn_due(&self, now: f64) -> bool {
        now > self.next_spawn_at
    }

    pub fn schedule_next_spawn(&mut self, now: f64, config: &SimConfig, rng: &mut fastrand::Rng) {
        self.next_spawn_at = now + config.prey_spawn_interval.sample(rng) as f64;
    }

    /// Spawn a batch off the viewport edges, then schedule the next one.
    pub fn spawn_batch(
        &mut self,
        now: f64,
        viewport: &Viewport,
        config: &SimConfig,
        rng: &mut fastrand::Rng,
    ) -> Vec<PreyId> {
        let count = spawn::sample_batch_count(rng).clamp(1, config.max_spawn_batch.max(1));
        let mut ids = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (pos, waypoint) = spawn::edge_placement(spawn::Edge::random(rng), viewport, rng);
            ids.push(self.spawn_at(pos, waypoint, now, config, rng));
        }
        self.schedule_next_spawn(now, config, rng);
        log::debug!(
            "spawned {} prey ({} live), next batch at {:.1}s",
            count,
            self.len(),
            self.next_spawn_at
        );
        ids
    }

    /// Spawn one prey at `pos` heading for `waypoint`.
    pub fn spawn_at(
        &mut self,
        pos: Vec2,
        waypoint: Vec2,
        now: f64,
        config: &SimConfig,
        rng: &mut fastrand::Rng,
    ) -> PreyId {
        let id = PreyId(self.next_id);
        self.next_id += 1;

        let size = config.prey_size.sample(rng).floor();
        let frame = rng.u32(0..config.prey_frames.max(1));
        self.world.spawn((
            id,
            Position(pos),
            Heading(0.0),
            Body { size },
            roam::fresh_roam(waypoint, now, rng),
            AnimState::starting_at(frame, config.prey_frames),
        ));
        id
    }

    /// Advance every prey's AI and drop the ones that wandered off.
    pub fn update(
        &mut self,
        dt: f32,
        now: f64,
        viewport: &Viewport,
        config: &SimConfig,
        rng: &mut fastrand::Rng,
    ) {
        roam::update(&mut self.world, dt, now, viewport, config, rng);

        for entity in roam::wandered_off(&self.world, viewport) {
            if self.world.despawn(entity).is_ok() {
                log::debug!("prey left the screen for good");
            }
        }
    }

    /// Closest prey that is still free to be chased.
    pub fn find_nearest(&self, point: Vec2) -> Option<Nearest> {
        let mut best: Option<Nearest> = None;
        for (_, (id, pos, ensnared)) in self
            .world
            .query::<(&PreyId, &Position, Option<&Ensnared>)>()
            .iter()
        {
            if ensnared.is_some() {
                continue;
            }
            let dist = pos.0.distance(point);
            if best.map_or(true, |b| dist < b.dist) {
                best = Some(Nearest {
                    id: *id,
                    pos: pos.0,
                    dist,
                });
            }
        }
        best
    }

    /// Lowest-id free prey within `radius` of `point`.
    pub fn first_within(&self, point: Vec2, radius: f32) -> Option<PreyId> {
        self.world
            .query::<(&PreyId, &Position, Option<&Ensnared>)>()
            .iter()
            .filter(|(_, (_, pos, ensnared))| ensnared.is_none() && pos.0.distance(point) <= radius)
            .map(|(_, (id, _, _))| *id)
            .min()
    }

    /// Idempotent: removing an absent id is a no-op returning `false`.
    pub fn remove(&mut self, id: PreyId) -> bool {
        match self.entity_of(id) {
            Some(entity) => self.world.despawn(entity).is_ok(),
            None => false,
        }
    }

    /// Freeze a prey in a web until `release_at`.
    pub fn ensnare(&mut self, id: PreyId, release_at: f64) -> bool {
        let Some(entity) = self.entity_of(id) else {
            return false;
        };
        self.world
            .insert_one(
                entity,
                Ensnared {
                    release_at,
                    thrash_timer: 0.0,
                },
            )
            .is_ok()
    }

    /// Remove webbed prey whose time is up.
    pub fn release_expired(&mut self, now: f64) -> Vec<PreyId> {
        let expired: Vec<(hecs::Entity, PreyId)> = self
            .world
            .query::<(&PreyId, &Ensnared)>()
            .iter()
            .filter(|(_, (_, web))| now > web.release_at)
            .map(|(entity, (id, _))| (entity, *id))
            .collect();

        let mut ids = Vec::with_capacity(expired.len());
        for (entity, id) in expired {
            if self.world.despawn(entity).is_ok() {
                ids.push(id);
            }
        }
        ids
    }

    /// Pull every waypoint back inside a (possibly smaller) viewport.
    pub fn clamp_waypoints(&mut self, viewport: &Viewport) {
        for (_, roam) in self.world.query_mut::<&mut Roam>() {
            roam.waypoint = viewport.clamp(roam.waypoint, roam::WAYPOINT_INSET);
        }
    }

    pub fn contains(&self, id: PreyId) -> bool {
        self.entity_of(id).is_some()
    }

    pub fn position(&self, id: PreyId) -> Option<Vec2> {
        let entity = self.entity_of(id)?;
        self.world.get::<&Position>(entity).ok().map(|p| p.0)
    }

    pub fn is_ensnared(&self, id: PreyId) -> bool {
        self.entity_of(id)
            .map_or(false, |e| self.world.get::<&Ensnared>(e).is_ok())
    }

    pub fn waypoint(&self, id: PreyId) -> Option<Vec2> {
        let entity = self.entity_of(id)?;
        self.world.get::<&Roam>(entity).ok().map(|r| r.waypoint)
    }

    /// Live ids in ascending order.
    pub fn ids(&self) -> Vec<PreyId> {
        let mut ids: Vec<PreyId> = self.world.query::<&PreyId>().iter().map(|(_, id)| *id).collect();
        ids.sort();
        ids
    }

    pub fn poses(&self) -> Vec<PreyPose> {
        let mut poses: Vec<PreyPose> = self
            .world
            .query::<(&PreyId, &Position, &Heading, &Body, &AnimState, Option<&Ensnared>)>()
            .iter()
            .map(|(_, (id, pos, heading, body, anim, ensnared))| PreyPose {
                id: *id,
                pos: pos.0,
                heading: heading.0,
                size: body.size,
                frame: anim.frame,
                ensnared: ensnared.is_some(),
            })
            .collect();
        poses.sort_by_key(|p| p.id);
        poses
    }

    fn entity_of(&self, id: PreyId) -> Option<hecs::Entity> {
        let mut query = self.world.query::<&PreyId>();
        let found = query.iter().find(|(_, pid)| **pid == id).map(|(entity, _)| entity);
        found
    }
}
