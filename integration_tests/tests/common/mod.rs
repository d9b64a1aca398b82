use std::path::PathBuf;
use std::sync::Once;

use bevy::app::App;
use bevy::ecs::event::Events;
use bevy::prelude::Entity;
use disguise_sim::{
    build_headless_app, ApparentOwnerChanged, Order, Player, PlayerColor, PlayerId,
    PlayerRegistry,
};

pub const GREECE: PlayerId = PlayerId(1);
pub const ENGLAND: PlayerId = PlayerId(2);
pub const USSR: PlayerId = PlayerId(3);
pub const UKRAINE: PlayerId = PlayerId(4);

static INIT: Once = Once::new();

pub fn ensure_test_config() {
    INIT.call_once(|| {
        let catalog_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("test_actor_catalog.json");

        debug_assert!(
            catalog_path.exists(),
            "missing test actor catalog at {}",
            catalog_path.display()
        );

        std::env::set_var("ACTOR_CATALOG_PATH", &catalog_path);
    });
}

/// Headless app with two alliances: Greece+England against USSR+Ukraine.
pub fn match_app() -> App {
    ensure_test_config();
    let mut app = build_headless_app();
    {
        let mut players = app.world.resource_mut::<PlayerRegistry>();
        for (id, name, faction, color) in [
            (GREECE, "Greece", "allies", PlayerColor::rgb(0, 80, 200)),
            (ENGLAND, "England", "allies", PlayerColor::rgb(0, 200, 80)),
            (USSR, "USSR", "soviet", PlayerColor::rgb(200, 20, 20)),
            (UKRAINE, "Ukraine", "soviet", PlayerColor::rgb(240, 200, 0)),
        ] {
            players.add_player(Player {
                id,
                name: name.to_string(),
                faction: faction.to_string(),
                color,
            });
        }
        players.set_allied(GREECE, ENGLAND);
        players.set_allied(USSR, UKRAINE);
    }
    app
}

pub fn disguise_order(actor: Entity, target: Option<Entity>) -> Order {
    Order::Disguise {
        actor,
        target,
        queued: false,
    }
}

pub fn drain_owner_changes(app: &mut App) -> Vec<ApparentOwnerChanged> {
    app.world
        .resource_mut::<Events<ApparentOwnerChanged>>()
        .drain()
        .collect()
}
