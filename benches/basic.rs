use criterion::{criterion_group, criterion_main, Criterion};
use fieldbus_serial::{open_with, MockLineDriver, PortConfig};
use std::hint::black_box;
use std::time::Duration;

pub fn bench_echo_round_trip(c: &mut Criterion) {
    let config = PortConfig::new("/dev/ttyMOCK0").timeout(Duration::from_millis(100));
    let mut port = open_with(MockLineDriver::echo(), &config).unwrap();
    let frame = [0x01, 0x03, 0x00, 0x00, 0x00, 0x0A, 0xC5, 0xCD];
    let mut buffer = [0u8; 256];

    c.bench_function("echo_write_read_8_bytes", |b| {
        b.iter(|| {
            port.write(black_box(&frame)).unwrap();
            let n = port.read(&mut buffer).unwrap();
            black_box(n);
        })
    });
}

criterion_group!{
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_millis(300))
        .measurement_time(Duration::from_secs(2));
    targets = bench_echo_round_trip
}
criterion_main!(benches);
