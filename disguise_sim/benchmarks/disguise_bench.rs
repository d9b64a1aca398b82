use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use disguise_sim::{
    build_headless_app, run_tick, spawn_actor, submit_order, Order, Player, PlayerColor, PlayerId,
    PlayerRegistry,
};

fn setup(spies: usize) -> bevy::app::App {
    let mut app = build_headless_app();
    {
        let mut players = app.world.resource_mut::<PlayerRegistry>();
        players.add_player(Player {
            id: PlayerId(1),
            name: "Greece".to_string(),
            faction: "allies".to_string(),
            color: PlayerColor::rgb(0, 80, 200),
        });
        players.add_player(Player {
            id: PlayerId(2),
            name: "USSR".to_string(),
            faction: "soviet".to_string(),
            color: PlayerColor::rgb(200, 20, 20),
        });
    }
    let rifle = spawn_actor(&mut app.world, "e1", PlayerId(2)).expect("rifle spawns");
    for _ in 0..spies {
        let spy = spawn_actor(&mut app.world, "spy", PlayerId(1)).expect("spy spawns");
        let order = Order::Disguise {
            actor: spy,
            target: Some(rifle),
            queued: false,
        };
        submit_order(&mut app.world, PlayerId(1), order).expect("order accepted");
    }
    app
}

fn bench_disguise_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("disguise_orders");

    for spies in [16usize, 128, 1024] {
        group.bench_with_input(BenchmarkId::new("spies", spies), &spies, |b, &spies| {
            b.iter_batched(
                || setup(spies),
                |mut app| {
                    run_tick(&mut app);
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(disguise_benches, bench_disguise_orders);
criterion_main!(disguise_benches);
