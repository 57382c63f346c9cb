use criterion::*;
use fixed_csc::fixed_point::{BrightnessValue, HsbcFactor};
use fixed_csc::trig::{cosine, sine, Angle};
use fixed_csc::{
    generate_matrix, ColourPrimary, ColourSpace, CscGenerator, CscRequest, HsbcSettings, Range,
};
use itertools::iproduct;

const SAMPLE_SIZE: usize = 50;

fn all_requests(hsbc: Option<HsbcSettings>) -> Vec<CscRequest> {
    let sides = || iproduct!(ColourSpace::ALL, Range::ALL, ColourPrimary::ALL);
    iproduct!(sides(), sides())
        .map(|(input, output)| CscRequest {
            input_space: input.0,
            output_space: output.0,
            input_range: input.1,
            output_range: output.1,
            input_primary: input.2,
            output_primary: output.2,
            hsbc,
        })
        .collect()
}

fn bench(c: &mut Criterion) {
    // Validates the built-in tables outside of the measurements
    CscGenerator::global();

    let mut group = c.benchmark_group("fixed-csc");
    group.sample_size(SAMPLE_SIZE);

    {
        let requests = all_requests(None);
        group.throughput(Throughput::Elements(requests.len() as u64));
        group.bench_function("generate", move |b| {
            b.iter(|| {
                for request in &requests {
                    black_box(generate_matrix(black_box(request)));
                }
            });
        });
    }

    {
        let settings = HsbcSettings {
            hue: HsbcFactor::from_int(-12),
            saturation: HsbcFactor::from_bits(3 << 24),
            brightness: BrightnessValue::from_int(8),
            contrast: HsbcFactor::from_bits(5 << 23),
        };

        let requests = all_requests(Some(settings));
        group.throughput(Throughput::Elements(requests.len() as u64));
        group.bench_function("generate+hsbc", move |b| {
            b.iter(|| {
                for request in &requests {
                    black_box(generate_matrix(black_box(request)));
                }
            });
        });
    }

    {
        const STEPS: u32 = 4096;
        let step = Angle::TWO_PI.to_bits() / STEPS;
        group.throughput(Throughput::Elements(u64::from(STEPS)));
        group.bench_function("sine+cosine", move |b| {
            b.iter(|| {
                for i in 0..STEPS {
                    let angle = Angle::from_bits(i * step);
                    black_box(sine(black_box(angle)));
                    black_box(cosine(black_box(angle)));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
