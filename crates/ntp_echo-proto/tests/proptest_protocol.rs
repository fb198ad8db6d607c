use echo_proto::protocol::{
    ConstPackedSizeBytes, FromBytes, Packet, ShortFormat, TimestampFormat, ToBytes,
};
use echo_proto::unix_time::{self, Instant};
use proptest::prelude::*;

/// Strategy that generates exactly 48 random bytes.
fn arb_48_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 48)
}

proptest! {
    #[test]
    fn short_format_roundtrip(seconds in any::<u16>(), fraction in any::<u16>()) {
        let sf = ShortFormat { seconds, fraction };
        let mut buf = [0u8; 4];
        prop_assert_eq!(sf.to_bytes(&mut buf).unwrap(), 4);
        let (parsed, consumed) = ShortFormat::from_bytes(&buf).unwrap();
        prop_assert_eq!(consumed, 4);
        prop_assert_eq!(sf, parsed);
    }

    #[test]
    fn timestamp_format_roundtrip(seconds in any::<u32>(), fraction in any::<u32>()) {
        let ts = TimestampFormat { seconds, fraction };
        let mut buf = [0u8; 8];
        prop_assert_eq!(ts.to_bytes(&mut buf).unwrap(), 8);
        let (parsed, consumed) = TimestampFormat::from_bytes(&buf).unwrap();
        prop_assert_eq!(consumed, 8);
        prop_assert_eq!(ts, parsed);
    }

    /// Any 48 random bytes parse, since every 3-bit mode and 2-bit leap value is defined.
    #[test]
    fn packet_from_arbitrary_bytes_always_parses(bytes in arb_48_bytes()) {
        prop_assert!(Packet::from_bytes(&bytes).is_ok());
    }

    /// Buffers shorter than 48 bytes must always return Err.
    #[test]
    fn packet_from_short_buffer_always_errors(len in 0usize..48) {
        let buf = vec![0u8; len];
        let result = Packet::from_bytes(&buf);
        prop_assert!(result.is_err());
        prop_assert!(result.unwrap_err().is_malformed());
    }

    /// Decoding then encoding reproduces the input byte for byte.
    #[test]
    fn packet_bytes_roundtrip(bytes in arb_48_bytes()) {
        let (packet, consumed) = Packet::from_bytes(&bytes).unwrap();
        prop_assert_eq!(consumed, Packet::PACKED_SIZE_BYTES);
        let encoded = packet.encode().unwrap();
        prop_assert_eq!(&encoded[..], &bytes[..]);
    }

    #[test]
    fn instant_conversion_fraction_is_exact(secs in 0i64..4_000_000_000, nanos in 0i32..1_000_000_000) {
        let ts: TimestampFormat = Instant::new(secs, nanos).into();
        prop_assert_eq!(ts.fraction as u64, ((nanos as u64) << 32) / 1_000_000_000);
        prop_assert_eq!(ts.seconds as i64, (secs + unix_time::EPOCH_DELTA).rem_euclid(unix_time::ERA_SECONDS));
    }

    #[test]
    fn float_conversion_never_panics(t in any::<f64>()) {
        let result = unix_time::timestamp_from_unix_secs_f64(t);
        prop_assert_eq!(result.is_ok(), t.is_finite());
    }
}
