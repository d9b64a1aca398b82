mod common;

use common::{disguise_order, drain_owner_changes, match_app, GREECE, USSR};
use disguise_sim::{
    run_tick, spawn_actor, submit_order, AttackCommitted, CargoUnloading, Conditions, Damaged,
    Demolishing, Disguise, Infiltrating, InWorld, Order, PreparingAttack, SubmitError,
};

fn disguise_of(app: &bevy::app::App, entity: bevy::prelude::Entity) -> &Disguise {
    app.world.get::<Disguise>(entity).expect("actor should carry a disguise")
}

fn condition_count(app: &bevy::app::App, entity: bevy::prelude::Entity) -> usize {
    app.world
        .get::<Conditions>(entity)
        .map(|conditions| conditions.count("disguise"))
        .unwrap_or_default()
}

/// A spy disguised as an enemy rifleman looks like the rifleman's owner and
/// holds the disguise condition.
#[test]
fn spy_disguises_as_enemy_rifleman() -> anyhow::Result<()> {
    let mut app = match_app();
    let spy = spawn_actor(&mut app.world, "spy", GREECE)?;
    let rifle = spawn_actor(&mut app.world, "e1", USSR)?;

    submit_order(&mut app.world, GREECE, disguise_order(spy, Some(rifle)))?;
    run_tick(&mut app);

    let disguise = disguise_of(&app, spy);
    assert!(disguise.is_disguised());
    assert_eq!(disguise.apparent_owner(), Some(USSR));
    assert_eq!(
        disguise.apparent_sprite().map(|sprite| sprite.0.as_str()),
        Some("e1.soviet")
    );
    assert!(disguise.condition_token().is_some());
    assert_eq!(condition_count(&app, spy), 1);

    let changes = drain_owner_changes(&mut app);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].entity, spy);
    assert_eq!((changes[0].previous, changes[0].current), (GREECE, USSR));
    Ok(())
}

/// Committing an attack drops the disguise, revokes the condition and tells
/// observers the effective owner went back to the true one.
#[test]
fn committed_attack_reveals_spy() -> anyhow::Result<()> {
    let mut app = match_app();
    let spy = spawn_actor(&mut app.world, "spy", GREECE)?;
    let rifle = spawn_actor(&mut app.world, "e1", USSR)?;
    submit_order(&mut app.world, GREECE, disguise_order(spy, Some(rifle)))?;
    run_tick(&mut app);
    drain_owner_changes(&mut app);

    app.world.send_event(PreparingAttack {
        attacker: spy,
        target: Some(rifle),
        weapon: "silenced-pistol".to_string(),
    });
    run_tick(&mut app);
    assert!(disguise_of(&app, spy).is_disguised());
    assert!(drain_owner_changes(&mut app).is_empty());

    app.world.send_event(AttackCommitted {
        attacker: spy,
        target: Some(rifle),
        weapon: "silenced-pistol".to_string(),
        emitter: None,
    });
    run_tick(&mut app);

    let disguise = disguise_of(&app, spy);
    assert!(!disguise.is_disguised());
    assert!(disguise.condition_token().is_none());
    assert_eq!(condition_count(&app, spy), 0);

    let changes = drain_owner_changes(&mut app);
    assert_eq!(changes.len(), 1);
    assert_eq!((changes[0].previous, changes[0].current), (USSR, GREECE));
    Ok(())
}

#[test]
fn self_targeted_order_clears_disguise() -> anyhow::Result<()> {
    let mut app = match_app();
    let spy = spawn_actor(&mut app.world, "spy", GREECE)?;
    let rifle = spawn_actor(&mut app.world, "e1", USSR)?;

    // Already clear: nothing to revoke.
    submit_order(&mut app.world, GREECE, disguise_order(spy, Some(spy)))?;
    run_tick(&mut app);
    assert!(!disguise_of(&app, spy).is_disguised());
    assert_eq!(condition_count(&app, spy), 0);

    submit_order(&mut app.world, GREECE, disguise_order(spy, Some(rifle)))?;
    run_tick(&mut app);
    submit_order(&mut app.world, GREECE, disguise_order(spy, Some(spy)))?;
    run_tick(&mut app);

    assert!(!disguise_of(&app, spy).is_disguised());
    assert_eq!(condition_count(&app, spy), 0);
    Ok(())
}

#[test]
fn target_leaving_world_clears_disguise() -> anyhow::Result<()> {
    let mut app = match_app();
    let spy = spawn_actor(&mut app.world, "spy", GREECE)?;
    let rifle = spawn_actor(&mut app.world, "e1", USSR)?;
    let rocket = spawn_actor(&mut app.world, "e3", USSR)?;
    submit_order(&mut app.world, GREECE, disguise_order(spy, Some(rifle)))?;
    run_tick(&mut app);

    app.world.entity_mut(rocket).remove::<InWorld>();
    submit_order(&mut app.world, GREECE, disguise_order(spy, Some(rocket)))?;
    run_tick(&mut app);

    assert!(!disguise_of(&app, spy).is_disguised());
    Ok(())
}

#[test]
fn disguising_as_disguised_spy_copies_its_disguise() -> anyhow::Result<()> {
    let mut app = match_app();
    let first = spawn_actor(&mut app.world, "spy", GREECE)?;
    let second = spawn_actor(&mut app.world, "spy", GREECE)?;
    let rifle = spawn_actor(&mut app.world, "e1", USSR)?;

    submit_order(&mut app.world, GREECE, disguise_order(first, Some(rifle)))?;
    run_tick(&mut app);
    submit_order(&mut app.world, GREECE, disguise_order(second, Some(first)))?;
    run_tick(&mut app);

    assert_eq!(
        disguise_of(&app, second).identity(),
        disguise_of(&app, first).identity()
    );
    assert_eq!(disguise_of(&app, second).apparent_owner(), Some(USSR));
    Ok(())
}

#[test]
fn zero_damage_does_not_reveal() -> anyhow::Result<()> {
    let mut app = match_app();
    let spy = spawn_actor(&mut app.world, "spy", GREECE)?;
    let rifle = spawn_actor(&mut app.world, "e1", USSR)?;
    submit_order(&mut app.world, GREECE, disguise_order(spy, Some(rifle)))?;
    run_tick(&mut app);

    for damage in [0, -30] {
        app.world.send_event(Damaged {
            entity: spy,
            damage,
            attacker: None,
        });
    }
    run_tick(&mut app);
    assert!(disguise_of(&app, spy).is_disguised());

    app.world.send_event(Damaged {
        entity: spy,
        damage: 20,
        attacker: Some(rifle),
    });
    run_tick(&mut app);
    assert!(!disguise_of(&app, spy).is_disguised());
    Ok(())
}

#[test]
fn unload_demolish_and_infiltrate_reveal_when_configured() -> anyhow::Result<()> {
    let mut app = match_app();
    let rifle = spawn_actor(&mut app.world, "e1", USSR)?;

    for trigger in 0..3 {
        let spy = spawn_actor(&mut app.world, "spy", GREECE)?;
        submit_order(&mut app.world, GREECE, disguise_order(spy, Some(rifle)))?;
        run_tick(&mut app);
        assert!(disguise_of(&app, spy).is_disguised());

        match trigger {
            0 => {
                app.world.send_event(CargoUnloading { carrier: spy });
            }
            1 => {
                app.world.send_event(Demolishing { entity: spy });
            }
            _ => {
                app.world.send_event(Infiltrating {
                    entity: spy,
                    target: None,
                });
            }
        }
        run_tick(&mut app);
        assert!(!disguise_of(&app, spy).is_disguised());
    }
    Ok(())
}

#[test]
fn later_unqueued_order_supersedes_earlier_one() -> anyhow::Result<()> {
    let mut app = match_app();
    let spy = spawn_actor(&mut app.world, "spy", GREECE)?;
    let rifle = spawn_actor(&mut app.world, "e1", USSR)?;
    let rocket = spawn_actor(&mut app.world, "e3", USSR)?;

    submit_order(&mut app.world, GREECE, disguise_order(spy, Some(rifle)))?;
    submit_order(&mut app.world, GREECE, disguise_order(spy, Some(rocket)))?;
    run_tick(&mut app);

    assert_eq!(
        disguise_of(&app, spy)
            .apparent_actor_type()
            .map(|id| id.as_str()),
        Some("e3")
    );
    assert_eq!(drain_owner_changes(&mut app).len(), 1);

    // Queued orders stack and each resolves in submission order.
    for target in [rifle, rocket] {
        let order = Order::Disguise {
            actor: spy,
            target: Some(target),
            queued: true,
        };
        submit_order(&mut app.world, GREECE, order)?;
    }
    run_tick(&mut app);
    assert_eq!(drain_owner_changes(&mut app).len(), 2);
    assert_eq!(
        disguise_of(&app, spy)
            .apparent_actor_type()
            .map(|id| id.as_str()),
        Some("e3")
    );
    Ok(())
}

#[test]
fn order_onto_untargetable_actor_is_rejected() -> anyhow::Result<()> {
    let mut app = match_app();
    let spy = spawn_actor(&mut app.world, "spy", GREECE)?;
    let dog = spawn_actor(&mut app.world, "dog", USSR)?;

    let result = submit_order(&mut app.world, GREECE, disguise_order(spy, Some(dog)));
    assert!(matches!(result, Err(SubmitError::InvalidTarget { .. })));

    run_tick(&mut app);
    assert!(!disguise_of(&app, spy).is_disguised());
    assert!(drain_owner_changes(&mut app).is_empty());
    Ok(())
}
