// Benchmarks for NTP header parsing, serialization and timestamp conversion.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use echo_proto::protocol::{
    ConstPackedSizeBytes, FromBytes, LeapIndicator, Mode, Packet, ReferenceIdentifier,
    ShortFormat, Stratum, TimestampFormat, ToBytes, Version,
};
use echo_proto::unix_time::Instant;

fn make_test_packet() -> Packet {
    Packet {
        leap_indicator: LeapIndicator::NoWarning,
        version: Version::V3,
        mode: Mode::Server,
        stratum: Stratum::SECONDARY_MIN,
        poll: 10,
        precision: 0,
        root_delay: ShortFormat::default(),
        root_dispersion: ShortFormat::default(),
        reference_id: ReferenceIdentifier::UNSET,
        reference_timestamp: TimestampFormat {
            seconds: 3_913_055_995,
            fraction: 0xABCD_1234,
        },
        origin_timestamp: TimestampFormat {
            seconds: 3_913_056_001,
            fraction: 0x1111_2222,
        },
        receive_timestamp: TimestampFormat {
            seconds: 3_913_056_000,
            fraction: 0xABCD_1234,
        },
        transmit_timestamp: TimestampFormat {
            seconds: 3_913_056_000,
            fraction: 0xABCE_0000,
        },
    }
}

fn bench_packet_from_bytes(c: &mut Criterion) {
    let pkt = make_test_packet();
    let mut buf = [0u8; Packet::PACKED_SIZE_BYTES];
    pkt.to_bytes(&mut buf).unwrap();

    c.bench_function("packet_from_bytes", |b| {
        b.iter(|| Packet::from_bytes(black_box(&buf)).unwrap())
    });
}

fn bench_packet_to_bytes(c: &mut Criterion) {
    let pkt = make_test_packet();
    let mut buf = [0u8; Packet::PACKED_SIZE_BYTES];

    c.bench_function("packet_to_bytes", |b| {
        b.iter(|| black_box(&pkt).to_bytes(&mut buf).unwrap())
    });
}

fn bench_packet_roundtrip(c: &mut Criterion) {
    let pkt = make_test_packet();

    c.bench_function("packet_roundtrip", |b| {
        b.iter(|| {
            let buf = black_box(&pkt).encode().unwrap();
            Packet::decode(black_box(&buf)).unwrap()
        })
    });
}

fn bench_instant_to_timestamp(c: &mut Criterion) {
    let instant = Instant::new(1_704_067_200, 123_456_789);

    c.bench_function("instant_to_timestamp", |b| {
        b.iter(|| TimestampFormat::from(black_box(instant)))
    });
}

criterion_group!(
    benches,
    bench_packet_from_bytes,
    bench_packet_to_bytes,
    bench_packet_roundtrip,
    bench_instant_to_timestamp,
);
criterion_main!(benches);
