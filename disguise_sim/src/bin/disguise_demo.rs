use bevy::ecs::event::Events;
use tracing::{info, warn};

use disguise_sim::presentation::{owner_for, radar_color_for, tooltip_description_for};
use disguise_sim::{
    build_headless_app, run_tick, spawn_actor, submit_order, ApparentOwnerChanged,
    AttackCommitted, DisplaySettings, Order, Player, PlayerColor, PlayerId, PlayerRegistry,
    SimulationTick,
};

const GREECE: PlayerId = PlayerId(1);
const ENGLAND: PlayerId = PlayerId(2);
const USSR: PlayerId = PlayerId(3);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut app = build_headless_app();
    {
        let mut players = app.world.resource_mut::<PlayerRegistry>();
        for (id, name, faction, color) in [
            (GREECE, "Greece", "allies", PlayerColor::rgb(0, 80, 200)),
            (ENGLAND, "England", "allies", PlayerColor::rgb(0, 200, 80)),
            (USSR, "USSR", "soviet", PlayerColor::rgb(200, 20, 20)),
        ] {
            players.add_player(Player {
                id,
                name: name.to_string(),
                faction: faction.to_string(),
                color,
            });
        }
        players.set_allied(GREECE, ENGLAND);
    }

    let spawned = spawn_actor(&mut app.world, "spy", GREECE)
        .and_then(|spy| spawn_actor(&mut app.world, "e1", USSR).map(|rifle| (spy, rifle)));
    let (spy, rifle) = match spawned {
        Ok(pair) => pair,
        Err(err) => {
            warn!(error = %err, "demo.spawn_failed");
            return;
        }
    };

    let order = Order::Disguise {
        actor: spy,
        target: Some(rifle),
        queued: false,
    };
    if let Err(err) = submit_order(&mut app.world, GREECE, order) {
        warn!(error = %err, "demo.submit_failed");
        return;
    }
    run_tick(&mut app);
    report(&mut app, spy);

    app.world.send_event(AttackCommitted {
        attacker: spy,
        target: Some(rifle),
        weapon: "silenced-pistol".to_string(),
        emitter: None,
    });
    run_tick(&mut app);
    report(&mut app, spy);
}

fn report(app: &mut bevy::app::App, spy: bevy::prelude::Entity) {
    let tick = app.world.resource::<SimulationTick>().0;
    let mode = app.world.resource::<DisplaySettings>().radar_color_mode;
    let tooltip = tooltip_description_for(&app.world, spy)
        .map(|info| info.name.clone())
        .unwrap_or_default();

    for viewer in [GREECE, ENGLAND, USSR] {
        let base = app
            .world
            .resource::<PlayerRegistry>()
            .color_of(GREECE)
            .unwrap_or(PlayerColor::rgb(255, 255, 255));
        info!(
            target: "disguise::demo",
            tick,
            %viewer,
            tooltip = %tooltip,
            owner = ?owner_for(&app.world, spy, viewer),
            radar = ?radar_color_for(&app.world, spy, viewer, base, mode),
            "spy.observed"
        );
    }

    let changes: Vec<ApparentOwnerChanged> = app
        .world
        .resource_mut::<Events<ApparentOwnerChanged>>()
        .drain()
        .collect();
    for change in changes {
        info!(
            target: "disguise::demo",
            tick,
            previous = %change.previous,
            current = %change.current,
            "spy.owner_changed"
        );
    }
}
