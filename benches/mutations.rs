use std::collections::HashSet;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use dashboard_grid::logging::{LogEvent, LogSink};
use dashboard_grid::{
    DashboardConfig, GridMetrics, Item, LayoutMutator, Logger, LoggingResult, MoveTarget,
    Mutation, MutatorConfig, Result, Row, Size, TileRegistry, solve,
};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

const ROWS: usize = 40;

fn build_dashboard() -> DashboardConfig {
    let rows = (0..ROWS)
        .map(|row| {
            let count = row % 4 + 1;
            let items = (0..count)
                .map(|col| Item::new(format!("metric-{row}-{col}")).with_kind("chart"))
                .collect();
            let sizes = dashboard_grid::balance(count, 12).unwrap_or_default();
            Row::new(format!("row-{}", row + 1), items, sizes)
        })
        .collect();
    DashboardConfig::new(rows)
}

fn build_mutator() -> Result<LayoutMutator> {
    let mut config = MutatorConfig::default()
        .with_validation(true)
        .with_logger(Logger::new(NullSink));
    config.enable_metrics();
    LayoutMutator::new(config)
}

fn scripted_mutations() -> Vec<Mutation> {
    vec![
        Mutation::ResizeColumn {
            row_id: "row-2".into(),
            boundary: 0,
            delta: 3,
        },
        Mutation::MoveItem {
            item_id: "metric-3-1".into(),
            target: MoveTarget::row("row-1"),
            target_index: 0,
        },
        Mutation::InsertRow {
            index: 10,
            item: Item::new("metric-new"),
        },
        Mutation::MoveItem {
            item_id: "metric-7-0".into(),
            target: MoveTarget::NewRow,
            target_index: 0,
        },
        Mutation::ReorderRows { from: 0, to: 20 },
        Mutation::RemoveItems {
            item_ids: vec!["metric-5-0".into(), "metric-9-2".into()],
        },
    ]
}

fn mutation_script(c: &mut Criterion) {
    let mutator = build_mutator().expect("mutator");
    let config = build_dashboard();
    let script = scripted_mutations();
    c.bench_function("mutation_script", |b| {
        b.iter(|| {
            mutator
                .apply_all(black_box(&config), &script)
                .expect("scripted mutations")
        });
    });
}

fn bulk_removal(c: &mut Criterion) {
    let mutator = build_mutator().expect("mutator");
    let config = build_dashboard();
    let ids: HashSet<String> = config
        .item_ids()
        .enumerate()
        .filter(|(idx, _)| idx % 3 == 0)
        .map(|(_, id)| id.clone())
        .collect();
    c.bench_function("bulk_removal", |b| {
        b.iter(|| {
            mutator
                .remove_items(black_box(&ids), &config)
                .expect("removal")
        });
    });
}

fn solve_and_sync(c: &mut Criterion) {
    let config = build_dashboard();
    let metrics = GridMetrics::new(Size::new(240, 800), 20).with_gap(1);
    c.bench_function("solve_and_sync", |b| {
        b.iter(|| {
            let placements = solve(black_box(&config), 12, metrics);
            let mut registry = TileRegistry::new();
            registry.sync(&config);
            (placements.len(), registry.take_dirty().len())
        });
    });
}

criterion_group!(benches, mutation_script, bulk_removal, solve_and_sync);
criterion_main!(benches);
