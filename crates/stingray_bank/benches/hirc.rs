use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

fn get_input() -> Vec<u8> {
    use stingray_bank::hirc::{MusicTrack, Sound};
    use stingray_bank::types::{BankSource, StreamType, TrackInfo, VORBIS};
    use stingray_bank::{BankBuilder, Hierarchy, HircRecord};

    let source = |source_id| BankSource {
        plugin_id: VORBIS,
        stream_type: StreamType::Bank,
        source_id,
        prefetch_size: 0,
        flags: 0,
    };

    let hierarchy = (0..2000u32)
        .map(|id| {
            if id % 2 == 0 {
                HircRecord::Sound(Sound {
                    id,
                    source: source(id),
                    tail: vec![0x00; 48],
                })
            } else {
                HircRecord::MusicTrack(MusicTrack {
                    id,
                    flags: 0,
                    sources: vec![source(id)],
                    track_info: vec![TrackInfo {
                        source_id: id,
                        ..Default::default()
                    }],
                    tail: vec![0x00; 32],
                })
            }
        })
        .collect::<Hierarchy>();

    let mut builder = BankBuilder::new(vec![0x8D, 0x00, 0x00, 0x00]);
    for id in 0..2000u32 {
        builder.add_media(id, &[0x55; 256]).unwrap();
    }
    builder.finish(&hierarchy, &[]).unwrap()
}

pub mod read {
    use divan::Bencher;
    use stingray_bank::Bank;

    #[divan::bench]
    fn parse(bencher: Bencher) {
        bencher.with_inputs(super::get_input).bench_refs(|data| {
            divan::black_box(Bank::parse(data).unwrap());
        });
    }
}

pub mod write {
    use divan::Bencher;
    use stingray_bank::{Bank, BankBuilder};

    #[divan::bench]
    fn rebuild(bencher: Bencher) {
        bencher
            .with_inputs(|| Bank::parse(&super::get_input()).unwrap())
            .bench_refs(|bank| {
                let mut builder = BankBuilder::new(bank.header.clone());
                for (id, bytes) in &bank.media {
                    builder.add_media(*id, bytes).unwrap();
                }
                divan::black_box(builder.finish(&bank.hierarchy, &bank.extra).unwrap());
            });
    }
}
