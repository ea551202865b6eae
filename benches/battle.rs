//! Battle and gacha throughput

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use summontale::combat::{Battle, BattleContext};
use summontale::currency::CurrencyLedger;
use summontale::gacha::RarityTable;
use summontale::progression::StageScaling;
use summontale::{DataManager, OwnedCharacter};

fn stage_battle(c: &mut Criterion) {
    let data = DataManager::default();
    let stage = &data.catalog.stages()[0];
    let scaling = StageScaling::for_stage(stage, &data.config);
    let Some(definition) = data.catalog.character("char_009") else {
        return;
    };

    c.bench_function("stage_battle_to_end", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| {
            let mut character = OwnedCharacter::new(definition.clone());
            let mut ledger = CurrencyLedger::new(0);
            let lineup = stage.monster_lineup(data.catalog.monsters(), &scaling, &mut rng);
            let Ok(mut battle) = Battle::stage(0, lineup, &mut character, &data.config) else {
                return;
            };
            let mut ctx = BattleContext {
                character: &mut character,
                catalog: &data.catalog,
                config: &data.config,
                ledger: &mut ledger,
                rng: &mut rng,
            };
            black_box(battle.run_to_end(&mut ctx, 10_000));
        })
    });
}

fn rarity_rolls(c: &mut Criterion) {
    let table = RarityTable::from_config(&DataManager::default().config);
    let mut rng = StdRng::seed_from_u64(3);

    c.bench_function("rarity_roll_x1000", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                black_box(table.roll(&mut rng));
            }
        })
    });
}

criterion_group!(benches, stage_battle, rarity_rolls);
criterion_main!(benches);
