use std::path::Path;

use criterion::{criterion_group, criterion_main, Criterion};
use file::{memory::MemoryFileSystem, AllSyncable, FileType};
use reconcile::Reconciler;
use tracker::{IdentifierIndex, TrackedTree};

/// `dirs` directories of `files` files each. `file_{f}` has the same content
/// and mtime in every directory, and directories are tracked under the name
/// of their neighbour, so every file has `dirs` candidates and is told apart
/// by path score.
fn fixture(dirs: usize, files: usize) -> (MemoryFileSystem, TrackedTree) {
    let mut fs = MemoryFileSystem::new("/root");
    let mut tree = TrackedTree::new(fs.fingerprint("/root"));
    let root = tree.root();
    for d in 0..dirs {
        let dir = format!("/root/dir_{d}");
        fs.add_dir(&dir).unwrap();
        let tracked_dir = tree
            .add_child(root, format!("dir_{}", (d + 1) % dirs), FileType::Directory, fs.fingerprint(&dir))
            .unwrap();
        for f in 0..files {
            let path = format!("{dir}/file_{f}");
            fs.add_file(&path, format!("{f}")).unwrap();
            if d > 0 {
                fs.copy_content(format!("/root/dir_0/file_{f}"), &path).unwrap();
            }
            tree.add_child(tracked_dir, format!("file_{f}"), FileType::File, fs.fingerprint(&path))
                .unwrap();
        }
    }
    (fs, tree)
}

fn criterion_benchmark(c: &mut Criterion) {
    let (fs, tree) = fixture(100, 100);
    c.bench_function("reconcile 100x100", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            let mut index = IdentifierIndex::default();
            Reconciler::new(&fs, &AllSyncable)
                .run(&mut tree, Path::new("/root"), &mut index)
                .unwrap()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
