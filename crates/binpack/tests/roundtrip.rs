use binpack::codec::{
    add_prefix, ByteOrder, PackConfig, PackError, Packer, PrefixWidth, Unpacker,
};

fn configs() -> [PackConfig; 2] {
    [
        PackConfig::default(),
        PackConfig::with_byte_order(ByteOrder::Big),
    ]
}

#[test]
fn integers_round_trip_in_both_byte_orders() {
    let u16s = [0, 1, 0x00FF, 0x0100, u16::MAX];
    let i32s = [i32::MIN, -1, 0, 1, i32::MAX];
    let u64s = [0, 1, u32::MAX as u64 + 1, u64::MAX];

    for cfg in configs() {
        let mut packer = Packer::with_config(Vec::new(), cfg.clone());
        for v in u16s {
            packer = packer.push_u16(v).push_i16(v as i16);
        }
        for v in i32s {
            packer = packer.push_i32(v).push_u32(v as u32);
        }
        for v in u64s {
            packer = packer.push_u64(v).push_i64(v as i64);
        }
        let wire = packer.finish().unwrap();

        let mut u = Unpacker::with_config(&wire[..], cfg);
        for v in u16s {
            assert_eq!(u.shift_u16().unwrap(), v);
            assert_eq!(u.shift_i16().unwrap(), v as i16);
        }
        for v in i32s {
            assert_eq!(u.shift_i32().unwrap(), v);
            assert_eq!(u.shift_u32().unwrap(), v as u32);
        }
        for v in u64s {
            assert_eq!(u.shift_u64().unwrap(), v);
            assert_eq!(u.shift_i64().unwrap(), v as i64);
        }
        assert!(u.shift_u8().unwrap_err().is_clean_eof());
    }
}

#[test]
fn every_byte_value_round_trips() {
    let mut packer = Packer::new(Vec::new());
    for b in 0..=u8::MAX {
        packer = packer.push_u8(b);
    }
    let wire = packer.finish().unwrap();

    let mut u = Unpacker::new(&wire[..]);
    for b in 0..=u8::MAX {
        assert_eq!(u.shift_u8().unwrap(), b);
    }
}

#[test]
fn prefix_helpers_feed_the_unpacker() {
    let payloads: [&[u8]; 4] = [b"", b"x", "héllo wörld".as_bytes(), &[0u8; 300]];
    for width in [PrefixWidth::U16, PrefixWidth::U32, PrefixWidth::U64] {
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let mut wire = Vec::new();
            for payload in payloads {
                wire.extend_from_slice(&add_prefix(payload, width, order).unwrap());
            }

            let mut u = Unpacker::with_config(&wire[..], PackConfig::with_byte_order(order));
            for payload in payloads {
                let got = u.shift_bytes_with_prefix(width).unwrap();
                assert_eq!(got.as_ref(), payload, "{width} {order}");
            }
        }
    }
}

#[test]
fn unicode_strings_round_trip() {
    let s = "héllo, 世界";
    let wire = Packer::new(Vec::new())
        .push_str_with_prefix(PrefixWidth::U16, s)
        .push_str(s)
        .finish()
        .unwrap();

    let (a, b) = Unpacker::new(&wire[..])
        .fetch_string_with_u16_prefix()
        .and_then(|u| u.fetch_string(s.len() as u64))
        .value()
        .unwrap();
    assert_eq!(a, s);
    assert_eq!(b, s);
}

#[test]
fn hostile_prefix_is_rejected_by_max_length() {
    let wire = u64::MAX.to_le_bytes();
    let fetched = Unpacker::new(&wire[..]).fetch_bytes_with_u64_prefix();
    assert!(matches!(
        fetched.error(),
        Some(PackError::LengthTooLarge { len: u64::MAX, .. })
    ));
}
