pub mod macros;

use warforge_data::{BehaviorKind, Entity, EntityKind, Vec2, Vec3};
use warforge_lib::model::config::AppConfig;
use warforge_lib::model::entity::{entity_id, generate_entity, SpawnSpec};
use warforge_lib::model::pipeline::{generate, GenerationRequest};
use warforge_lib::model::rng::SeededRng;
use warforge_lib::Simulation;

#[allow(dead_code)]
pub struct ScenarioBuilder {
    config: AppConfig,
    request: GenerationRequest,
    entities: Vec<Entity>,
    replace_roster: bool,
}

#[allow(dead_code)]
impl ScenarioBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            request: GenerationRequest {
                width: 32,
                height: 32,
                ..GenerationRequest::default()
            }
            .with_seed(12345),
            entities: Vec::new(),
            replace_roster: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.request = self.request.with_seed(seed);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.request.width = width;
        self.request.height = height;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_request<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut GenerationRequest),
    {
        modifier(&mut self.request);
        self
    }

    /// Drop the generated roster; only entities added with `with_entity` remain.
    pub fn empty_roster(mut self) -> Self {
        self.replace_roster = true;
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn build(self) -> Simulation {
        let mut result = generate(&self.request).expect("Failed to generate scenario in test builder");
        if self.replace_roster {
            result.entities.clear();
        }
        result.entities.extend(self.entities);
        Simulation::from_result(self.config, result)
    }
}

#[allow(dead_code)]
pub struct EntityBuilder {
    seq: u64,
    faction: String,
    kind: EntityKind,
    x: f64,
    y: f64,
    behavior: BehaviorKind,
    health: Option<f64>,
    perception: Option<f64>,
    target: Option<String>,
    patrol: Vec<Vec2>,
}

#[allow(dead_code)]
impl EntityBuilder {
    pub fn new(seq: u64) -> Self {
        Self {
            seq,
            faction: "alpha".to_string(),
            kind: EntityKind::Infantry,
            x: 10.0,
            y: 10.0,
            behavior: BehaviorKind::Idle,
            health: None,
            perception: None,
            target: None,
            patrol: Vec::new(),
        }
    }

    pub fn faction(mut self, faction: &str) -> Self {
        self.faction = faction.to_string();
        self
    }

    pub fn kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn behavior(mut self, behavior: BehaviorKind) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn health(mut self, health: f64) -> Self {
        self.health = Some(health);
        self
    }

    pub fn perception(mut self, perception: f64) -> Self {
        self.perception = Some(perception);
        self
    }

    pub fn target(mut self, seq: u64) -> Self {
        self.target = Some(entity_id(seq));
        self
    }

    pub fn patrol(mut self, route: &[(f64, f64)]) -> Self {
        self.patrol = route.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
        self
    }

    pub fn build(self) -> Entity {
        let mut rng = SeededRng::new(7_000 + self.seq);
        let spec = SpawnSpec {
            faction: &self.faction,
            kind: self.kind,
            x: self.x as i64,
            y: self.y as i64,
        };
        let mut e = generate_entity(&mut rng, &spec, entity_id(self.seq), 0);
        e.position = Vec3::new(self.x, self.y, 0.0);
        e.behavior.current = self.behavior;
        e.behavior.target = self.target;
        e.behavior.destination = None;
        e.behavior.patrol_route = self.patrol;
        e.behavior.patrol_index = 0;
        if let Some(health) = self.health {
            e.stats.health = health;
        }
        if let Some(perception) = self.perception {
            e.stats.perception = perception;
        }
        e
    }
}
