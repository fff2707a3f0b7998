use criterion::{Criterion, black_box, criterion_group, criterion_main};
use intstat::{
    ColumnSpec, Config, TableOptions, apply_columns, diff, parse_snapshot, print_rows,
    render_table, select_columns,
};

/// 生成一张 64 CPU、`rows` 行的中断表，`bump` 改变部分行的计数
fn create_test_table(rows: usize, bump: u64) -> String {
    let cpus = 64;
    let mut table = String::with_capacity(rows * cpus * 12);
    for cpu in 0..cpus {
        table.push_str(&format!(" CPU{cpu:<7}"));
    }
    table.push('\n');

    for irq in 0..rows {
        table.push_str(&format!("{irq:>4}:"));
        for cpu in 0..cpus {
            let base = (irq * 7919 + cpu * 104729) as u64 % 1_000_000;
            let count = if irq % 5 == 0 { base + bump } else { base };
            table.push_str(&format!(" {count:>10}"));
        }
        table.push_str("  IR-PCI-MSI 524288-edge      nvme0q1\n");
    }
    table.push_str("ERR:          0\nMIS:          0\n");
    table
}

fn bench_parse(c: &mut Criterion) {
    let table = create_test_table(200, 0);

    c.bench_function("parse_snapshot_64_cpus", |b| {
        b.iter(|| {
            let snapshot = parse_snapshot(black_box(&table)).unwrap();
            black_box(snapshot);
        })
    });
}

fn bench_diff(c: &mut Criterion) {
    let old = parse_snapshot(&create_test_table(200, 0)).unwrap();
    let new = parse_snapshot(&create_test_table(200, 3)).unwrap();

    c.bench_function("diff_snapshots", |b| {
        b.iter(|| {
            let delta = diff(black_box(&old), black_box(&new)).unwrap();
            black_box(delta);
        })
    });
}

fn bench_columns(c: &mut Criterion) {
    let snapshot = parse_snapshot(&create_test_table(200, 0)).unwrap();
    let spec = ColumnSpec::parse("0-7,16,32-35").unwrap();

    c.bench_function("select_and_apply_columns", |b| {
        b.iter(|| {
            let mut pruned = snapshot.clone();
            let columns = select_columns(&pruned, black_box(&spec), true);
            apply_columns(&mut pruned, &columns).unwrap();
            black_box(pruned);
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let snapshot = parse_snapshot(&create_test_table(200, 0)).unwrap();
    let options = TableOptions {
        show_zero: true,
        show_description: true,
    };

    c.bench_function("render_table", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(256 * 1024);
            render_table(&mut out, black_box(&snapshot), options).unwrap();
            black_box(out);
        })
    });

    c.bench_function("print_rows_non_trivial", |b| {
        let config = Config {
            non_trivial: true,
            ..Default::default()
        };
        b.iter(|| {
            let mut out = Vec::with_capacity(256 * 1024);
            print_rows(&mut out, black_box(snapshot.clone()), &config).unwrap();
            black_box(out);
        })
    });
}

criterion_group!(benches, bench_parse, bench_diff, bench_columns, bench_render);
criterion_main!(benches);
