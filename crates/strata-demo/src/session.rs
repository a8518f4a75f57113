//! Headless play session: a player walking, falling, jumping and sculpting
//! on the terrain, driven by a fixed input script.

use glam::Vec3;
use strata_config::Config;
use strata_coords::BlockCoord;
use strata_mesh::MeshBuffers;
use strata_physics::{BrushMode, TerrainBrush, TerrainQuery, ViewContext};
use strata_voxel::World;

/// Where the player's collision sphere sits relative to the camera.
const EYE_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 0.5);

/// Fixed simulation step in seconds.
pub const TICK_SECONDS: f32 = 1.0 / 30.0;

/// One tick's worth of scripted input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Input {
    /// Walk forward along the heading.
    pub forward: bool,
    /// Jump if standing on the ground.
    pub jump: bool,
    /// Sculpt where the camera looks.
    pub brush: Option<BrushMode>,
    /// Heading change in radians.
    pub turn: f32,
}

impl Input {
    /// Input used by the demo for tick `n`: walk continuously, turning slowly,
    /// jump every two seconds and alternate digging and building.
    pub fn scripted(n: u32) -> Self {
        Self {
            forward: true,
            jump: n % 60 == 59,
            brush: match n % 90 {
                0..=14 => Some(BrushMode::Dig),
                45..=59 => Some(BrushMode::Build),
                _ => None,
            },
            turn: 0.01,
        }
    }
}

/// Per-tick counters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickStats {
    /// Blocks handed to the renderer.
    pub drawn_blocks: usize,
    /// Triangles handed to the renderer.
    pub triangles: usize,
    /// Whether the player ended the tick standing on terrain.
    pub grounded: bool,
    /// Point edited by the brush, if any.
    pub edited: Option<Vec3>,
}

/// Player state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    /// Camera position.
    pub position: Vec3,
    /// Heading around +Z in radians.
    pub yaw: f32,
    /// Pitch in radians, negative looks down.
    pub pitch: f32,
    /// Downward speed; negative while rising after a jump.
    pub fall_speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            yaw: 0.0,
            pitch: -0.6,
            fall_speed: 0.0,
        }
    }
}

impl Player {
    /// Horizontal walking direction.
    pub fn heading(&self) -> Vec3 {
        Vec3::new((-self.yaw).sin(), (-self.yaw).cos(), 0.0)
    }

    /// Unit view direction.
    pub fn front(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.heading() * cos_pitch + Vec3::Z * sin_pitch
    }
}

/// Everything a running session owns.
pub struct Session {
    /// The terrain.
    pub world: World,
    /// The player.
    pub player: Player,
    query: TerrainQuery,
    brush: TerrainBrush,
    config: Config,
}

impl Session {
    /// Starts a session on `world` with the default player.
    pub fn new(world: World, config: &Config) -> Self {
        Self {
            world,
            player: Player::default(),
            query: TerrainQuery::new(config.view.flood_limit),
            brush: TerrainBrush::default(),
            config: config.clone(),
        }
    }

    /// Advances the simulation by `dt` seconds and draws the frame.
    pub fn tick(&mut self, input: Input, dt: f32) -> TickStats {
        let mut stats = TickStats::default();
        let player_cfg = &self.config.player;

        self.player.yaw += input.turn;
        self.player.fall_speed += player_cfg.gravity * dt;
        let mut motion = Vec3::new(0.0, 0.0, -self.player.fall_speed * dt);
        if input.forward {
            motion += self.player.heading() * player_cfg.walk_speed * dt;
        }

        if let Some(mode) = input.brush {
            stats.edited = self.brush.apply(
                &self.query,
                &mut self.world,
                self.player.position,
                self.player.front(),
                dt,
                mode,
            );
        }

        let body = self.player.position - EYE_OFFSET;
        if let Some(collision) =
            self.query
                .collide(&mut self.world, body, motion, player_cfg.radius)
        {
            motion = collision.motion;
            if collision.normal.z > 0.0 {
                stats.grounded = true;
                self.player.fall_speed = if input.jump {
                    -player_cfg.jump_speed
                } else {
                    0.0
                };
            }
        }
        self.player.position += motion;

        let view = ViewContext {
            position: self.player.position,
            view_distance: self.config.view.view_distance,
        };
        let mut drawn = 0;
        stats.triangles = self.query.draw(
            &mut self.world,
            &view,
            &mut |_: BlockCoord, _: &MeshBuffers| drawn += 1,
        );
        stats.drawn_blocks = drawn;
        stats
    }
}

#[cfg(test)]
mod tests {
    use strata_voxel::Block;

    use super::*;

    /// Flat ground with its surface at `z = 2`.
    fn flat(_: BlockCoord, block: &mut Block) {
        block.fill_with(|c| ((2.0 - (c.z as f32 + 0.5)) * 0.5, 0.0));
    }

    fn small_config() -> Config {
        let mut config = Config::default();
        config.view.view_distance = 8.0;
        config
    }

    #[test]
    fn test_player_falls_and_lands() {
        let mut session = Session::new(World::new(flat), &small_config());
        let mut grounded = false;
        for _ in 0..120 {
            grounded |= session.tick(Input::default(), TICK_SECONDS).grounded;
        }
        assert!(grounded);
        // Sphere of radius 1 rests on z = 2, camera sits half a unit above its centre.
        assert!((session.player.position.z - 3.5).abs() < 0.05, "{:?}", session.player);
        assert_eq!(session.player.fall_speed, 0.0);
    }

    #[test]
    fn test_walking_moves_along_heading() {
        let mut session = Session::new(World::new(flat), &small_config());
        for _ in 0..120 {
            session.tick(Input::default(), TICK_SECONDS);
        }
        let start = session.player.position;
        let walk = Input {
            forward: true,
            ..Input::default()
        };
        for _ in 0..30 {
            session.tick(walk, TICK_SECONDS);
        }
        let moved = session.player.position - start;
        assert!((moved.y - 10.0).abs() < 0.5, "moved {moved:?}");
        assert!(moved.x.abs() < 1e-3);
        assert!((session.player.position.z - 3.5).abs() < 0.05);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let mut session = Session::new(World::new(flat), &small_config());
        for _ in 0..120 {
            session.tick(Input::default(), TICK_SECONDS);
        }
        let rest = session.player.position.z;
        let jump = Input {
            jump: true,
            ..Input::default()
        };
        session.tick(jump, TICK_SECONDS);
        for _ in 0..5 {
            session.tick(Input::default(), TICK_SECONDS);
        }
        assert!(session.player.position.z > rest + 0.5);
    }

    #[test]
    fn test_brush_edits_terrain_in_view() {
        let mut session = Session::new(World::new(flat), &small_config());
        for _ in 0..120 {
            session.tick(Input::default(), TICK_SECONDS);
        }
        let dig = Input {
            brush: Some(BrushMode::Dig),
            ..Input::default()
        };
        let stats = session.tick(dig, TICK_SECONDS);
        let edited = stats.edited.expect("camera looks at the ground");
        assert!(edited.z < session.player.position.z);
        assert!(stats.drawn_blocks > 0);
        assert!(stats.triangles > 0);
    }

    #[test]
    fn test_scripted_input() {
        assert_eq!(Input::scripted(0).brush, Some(BrushMode::Dig));
        assert_eq!(Input::scripted(50).brush, Some(BrushMode::Build));
        assert_eq!(Input::scripted(30).brush, None);
        assert!(Input::scripted(59).jump);
        assert!(!Input::scripted(60).jump);
    }

    #[test]
    fn test_front_points_down_when_pitched() {
        let player = Player::default();
        assert!(player.front().z < 0.0);
        assert!((player.front().length() - 1.0).abs() < 1e-5);
        assert!((player.heading() - Vec3::Y).length() < 1e-6);
    }
}
