// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notecite-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notecite and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use notecite::store::SessionFolder;

mod config;
mod fixtures;

use fixtures::TempDir;

struct SeededFolder {
    _tmp: TempDir,
    folder: SessionFolder,
}

fn seed_folder(case: fixtures::Case) -> SeededFolder {
    let tmp = TempDir::new(&format!("store_load_{}", case.id()));
    let folder = SessionFolder::new(tmp.path());
    folder.save_record(&fixtures::record(case)).expect("save_record");
    SeededFolder { _tmp: tmp, folder }
}

// Benchmark identity (keep stable):
// - Group name in this file: `store.load_record`
// - Case IDs after the `/` are the fixture case ids.
fn benches_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store.load_record");
    for case in fixtures::Case::ALL {
        let seeded = seed_folder(case);
        let params = case.params();
        group.throughput(Throughput::Elements((params.segments + params.spans) as u64));
        group.bench_function(case.id(), move |b| {
            b.iter(|| {
                let loaded = seeded.folder.load_record().expect("load_record");
                black_box(loaded.note_spans.len())
            })
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = config::criterion();
    targets = benches_store
}
criterion_main!(benches);
