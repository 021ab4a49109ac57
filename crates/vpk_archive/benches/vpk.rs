use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

/// Build a directory file with `extensions * paths * files` shard entries
fn synthetic_directory(extensions: usize, paths: usize, files: usize) -> Vec<u8> {
    let mut body = Vec::new();
    for e in 0..extensions {
        body.extend_from_slice(format!("ext{e}\0").as_bytes());
        for p in 0..paths {
            body.extend_from_slice(format!("some/dir/{p}\0").as_bytes());
            for f in 0..files {
                body.extend_from_slice(format!("file{f}\0").as_bytes());
                body.extend_from_slice(&0u32.to_le_bytes());
                body.extend_from_slice(&0i16.to_le_bytes());
                body.extend_from_slice(&((f % 8) as i16).to_le_bytes());
                body.extend_from_slice(&((f * 64) as u32).to_le_bytes());
                body.extend_from_slice(&64u32.to_le_bytes());
                body.extend_from_slice(&0xFFFFu16.to_le_bytes());
            }
            body.push(0);
        }
        body.push(0);
    }
    body.push(0);

    let mut out = Vec::new();
    out.extend_from_slice(&vpk_archive::types::VPK_SIGNATURE.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(&body);
    out
}

pub mod read {
    use divan::Bencher;
    use std::io::Cursor;
    use vpk_archive::VpkArchive;

    fn get_input() -> Vec<u8> {
        super::synthetic_directory(16, 32, 64)
    }

    #[divan::bench]
    fn open(bencher: Bencher) {
        bencher.with_inputs(get_input).bench_refs(|data| {
            divan::black_box(VpkArchive::from_reader("pak01_dir.vpk", Cursor::new(data)).unwrap());
        });
    }

    #[divan::bench]
    fn resolve_last(bencher: Bencher) {
        let vpk = VpkArchive::from_reader("pak01_dir.vpk", Cursor::new(get_input())).unwrap();
        bencher.bench_local(move || {
            divan::black_box(vpk.get_file("some/dir/31/file63.ext15").unwrap());
        });
    }

    #[divan::bench]
    fn list_names(bencher: Bencher) {
        let vpk = VpkArchive::from_reader("pak01_dir.vpk", Cursor::new(get_input())).unwrap();
        bencher.bench_local(move || {
            divan::black_box(vpk.file_names().count());
        });
    }
}
