/// Asserts that the entity with the given id is in the given behavior state.
#[macro_export]
macro_rules! assert_behavior {
    ($sim:expr, $id:expr, $state:expr) => {
        let entity = $sim.entity($id).expect("Entity not found in simulation");
        assert_eq!(
            entity.behavior.current, $state,
            "Entity {} is in {:?}, expected {:?}",
            $id, entity.behavior.current, $state
        );
    };
}

/// Asserts that the entity with the given id is still in the roster but dead.
#[macro_export]
macro_rules! assert_entity_dead {
    ($sim:expr, $id:expr) => {
        let entity = $sim.entity($id).expect("Dead entities must stay in the roster");
        assert!(!entity.alive, "Entity {} should be dead but is alive", $id);
    };
}

/// Asserts that the roster holds exactly the expected number of entities.
#[macro_export]
macro_rules! assert_roster_size {
    ($sim:expr, $count:expr) => {
        assert_eq!($sim.entities.len(), $count, "Roster size mismatch");
    };
}
