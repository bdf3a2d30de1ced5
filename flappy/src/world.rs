//! A headless pipe-dodging world. Pipes scroll left at one
//! unit per tick; birds fall under gravity and flap upward
//! when their genome decides to.

use fixneat_nn::genomics::NNGenome;

use rand::rngs::StdRng;
use rand::Rng;

pub const WORLD_WIDTH: f32 = 400.0;
pub const GROUND_LEVEL: f32 = 450.0;
/// Number of sensor readings a bird takes.
pub const SENSOR_COUNT: usize = 3;
/// Genome output above which a bird flaps.
pub const FLAP_THRESHOLD: f32 = 0.73;

const PIPE_WIDTH: f32 = 52.0;
const PIPE_OPENING: f32 = 150.0;
const PIPE_INTERVAL: u32 = 200;
const FIRST_PIPE_DELAY: u32 = 10;

const BIRD_X: f32 = 50.0;
const BIRD_START_Y: f32 = 200.0;
const BIRD_WIDTH: f32 = 34.0;
const BIRD_HEIGHT: f32 = 24.0;
const GRAVITY: f32 = 0.3;
const TERMINAL_VELOCITY: f32 = 6.0;
const FLAP_VELOCITY: f32 = -6.0;
const FLAP_RECOVERY_VELOCITY: f32 = 3.0;
const SKY_LIMIT: f32 = 10.0;
const SENSOR_SCALE: f32 = 500.0;

/// Axis-aligned box, as (left, top, right, bottom).
#[derive(Clone, Copy, Debug, PartialEq)]
struct Rect(f32, f32, f32, f32);

impl Rect {
    fn overlaps(&self, other: &Rect) -> bool {
        self.0 < other.2 && self.2 > other.0 && self.1 < other.3 && self.3 > other.1
    }
}

/// A pair of pipes with an opening between them.
#[derive(Clone, Debug, PartialEq)]
pub struct Pipe {
    x: f32,
    bottom_height: f32,
}

impl Pipe {
    fn new(x: f32, bottom_height: f32) -> Pipe {
        Pipe { x, bottom_height }
    }

    /// Bottom edge of the top pipe.
    pub fn top_edge(&self) -> f32 {
        GROUND_LEVEL - self.bottom_height - PIPE_OPENING
    }

    /// Top edge of the bottom pipe.
    pub fn bottom_edge(&self) -> f32 {
        GROUND_LEVEL - self.bottom_height
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    /// Whether the pipe has scrolled completely past the birds.
    pub fn passed(&self) -> bool {
        self.x + PIPE_WIDTH <= BIRD_X
    }

    fn off_screen(&self) -> bool {
        self.x <= -PIPE_WIDTH
    }

    fn rects(&self) -> [Rect; 2] {
        let (left, right) = (self.x, self.x + PIPE_WIDTH);
        [
            Rect(left, 0.0, right, self.top_edge()),
            Rect(left, self.bottom_edge(), right, GROUND_LEVEL),
        ]
    }
}

/// The pipes shared by every bird of an episode.
#[derive(Debug)]
pub struct World {
    pipes: Vec<Pipe>,
    spawn_timer: u32,
    rng: StdRng,
}

impl World {
    pub fn new(rng: StdRng) -> World {
        World {
            pipes: vec![],
            spawn_timer: FIRST_PIPE_DELAY,
            rng,
        }
    }

    /// Advances the world by one tick: spawns a pipe when
    /// due, scrolls every pipe, and drops those off screen.
    pub fn advance(&mut self) {
        if self.spawn_timer == 0 {
            let bottom_height = self.rng.gen_range(50..=250) as f32;
            self.pipes.push(Pipe::new(WORLD_WIDTH, bottom_height));
            self.spawn_timer = PIPE_INTERVAL;
        }
        self.spawn_timer -= 1;

        for pipe in &mut self.pipes {
            pipe.x -= 1.0;
        }
        self.pipes.retain(|pipe| !pipe.off_screen());
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// The first pipe the birds have not yet passed.
    pub fn closest_pipe(&self) -> Option<&Pipe> {
        self.pipes.iter().find(|pipe| !pipe.passed())
    }
}

/// A bird's body: its vertical motion and latest sensor readings.
#[derive(Clone, Debug)]
pub struct Bird {
    y: f32,
    velocity: f32,
    flapping: bool,
    vision: [f32; SENSOR_COUNT],
}

impl Bird {
    pub fn new() -> Bird {
        Bird {
            y: BIRD_START_Y,
            velocity: 0.0,
            flapping: false,
            vision: [0.5, 1.0, 0.5],
        }
    }

    fn rect(&self) -> Rect {
        Rect(BIRD_X, self.y, BIRD_X + BIRD_WIDTH, self.y + BIRD_HEIGHT)
    }

    fn center(&self) -> (f32, f32) {
        (BIRD_X + BIRD_WIDTH / 2.0, self.y + BIRD_HEIGHT / 2.0)
    }

    /// Updates and returns the bird's sensors: vertical distance
    /// to the top pipe, horizontal distance to the pipe, and
    /// vertical distance to the bottom pipe, each scaled down by
    /// 500. Without a pipe ahead, the last readings are kept.
    pub fn look(&mut self, world: &World) -> [f32; SENSOR_COUNT] {
        if let Some(pipe) = world.closest_pipe() {
            let (x, y) = self.center();
            self.vision = [
                (y - pipe.top_edge()).max(0.0) / SENSOR_SCALE,
                (pipe.x() - x).max(0.0) / SENSOR_SCALE,
                (pipe.bottom_edge() - y).max(0.0) / SENSOR_SCALE,
            ];
        }
        self.vision
    }

    fn sky_collision(&self) -> bool {
        self.y < SKY_LIMIT
    }

    fn collides(&self, world: &World) -> bool {
        let rect = self.rect();
        let ground = Rect(0.0, GROUND_LEVEL, WORLD_WIDTH, GROUND_LEVEL + 50.0);
        self.sky_collision()
            || rect.overlaps(&ground)
            || world
                .pipes()
                .iter()
                .flat_map(Pipe::rects)
                .any(|pipe| rect.overlaps(&pipe))
    }

    /// Starts a flap, unless one is already under way
    /// or the bird is touching the sky.
    pub fn flap(&mut self) {
        if !self.flapping && !self.sky_collision() {
            self.flapping = true;
            self.velocity = FLAP_VELOCITY;
        }
        if self.velocity >= FLAP_RECOVERY_VELOCITY {
            self.flapping = false;
        }
    }

    /// Moves the bird one tick, returning whether it survived.
    /// A colliding bird stops dead.
    pub fn update(&mut self, world: &World) -> bool {
        if self.collides(world) {
            self.flapping = false;
            self.velocity = 0.0;
            return false;
        }
        self.velocity += GRAVITY;
        self.y += self.velocity;
        self.velocity = self.velocity.min(TERMINAL_VELOCITY);
        true
    }

    /// Runs one tick of the bird under `genome`'s control,
    /// returning whether it survived.
    pub fn step(&mut self, genome: &mut NNGenome, world: &World) -> bool {
        let sensors = self.look(world);
        if genome.evaluate(&sensors) > FLAP_THRESHOLD {
            self.flap();
        }
        self.update(world)
    }
}

impl Default for Bird {
    fn default() -> Bird {
        Bird::new()
    }
}
