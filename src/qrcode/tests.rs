use super::*;
use crate::error::DataTooLong;
use crate::penalty::MAX_PENALTY;
use crate::segment::{QrSegmentMode, ALPHANUMERIC_CHARSET};
use pretty_assertions::assert_eq;

const ALL_ECC: [QrCodeEcc; 4] = [
    QrCodeEcc::Low,
    QrCodeEcc::Medium,
    QrCodeEcc::Quartile,
    QrCodeEcc::High,
];

/// Bit positions (x, y) of the first format copy, least significant bit first.
fn format_positions_primary() -> Vec<(i32, i32)> {
    let mut result: Vec<(i32, i32)> = (0..6).map(|i| (8, i)).collect();
    result.extend([(8, 7), (8, 8), (7, 8)]);
    result.extend((9..15).map(|i| (14 - i, 8)));
    result
}

/// Bit positions of the second format copy, split between the other two finders.
fn format_positions_secondary(size: i32) -> Vec<(i32, i32)> {
    let mut result: Vec<(i32, i32)> = (0..8).map(|i| (size - 1 - i, 8)).collect();
    result.extend((8..15).map(|i| (8, size - 15 + i)));
    result
}

fn collect_bits(qr: &QrCode, positions: &[(i32, i32)]) -> u32 {
    positions
        .iter()
        .enumerate()
        .fold(0, |acc, (i, &(x, y))| acc | (u32::from(qr.get_module(x, y)) << i))
}

/// Reads the error correction level and mask back out of the format information.
fn read_format(qr: &QrCode) -> (QrCodeEcc, Mask) {
    let primary = collect_bits(qr, &format_positions_primary());
    let secondary = collect_bits(qr, &format_positions_secondary(qr.size()));
    assert_eq!(primary, secondary, "format copies disagree");
    let data = (primary ^ 0x5412) >> 10;
    let ecl = match data >> 3 {
        1 => QrCodeEcc::Low,
        0 => QrCodeEcc::Medium,
        3 => QrCodeEcc::Quartile,
        2 => QrCodeEcc::High,
        _ => unreachable!(),
    };
    let mask = Mask::new((data & 7) as u8);
    assert_eq!(format_bits(ecl, mask), primary, "format BCH mismatch");
    (ecl, mask)
}

/// Unmasks the data area and returns all raw codewords in placement order.
fn read_raw_codewords(qr: &QrCode, ecl: QrCodeEcc, mask: Mask) -> Vec<u8> {
    let mut functions = Canvas::new(qr.version(), ecl);
    functions.draw_function_patterns();
    let bits: Vec<bool> = zigzag(qr.size())
        .filter(|&(x, y)| !functions.is_function(x, y))
        .map(|(x, y)| qr.get_module(x, y) ^ mask.inverts(x, y))
        .collect();
    assert_eq!(bits.len(), QrCode::get_num_raw_data_modules(qr.version()));
    let rawcodewords = bits.len() / 8;
    BitBuffer(bits[..rawcodewords * 8].to_vec()).to_bytes()
}

/// Splits interleaved codewords back into blocks, checks each block's ECC, and
/// returns the concatenated data codewords.
fn deinterleave(raw: &[u8], ver: Version, ecl: QrCodeEcc) -> Vec<u8> {
    let numblocks = QrCode::table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl);
    let blockecclen = QrCode::table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl);
    let numdata = QrCode::get_num_data_codewords(ver, ecl);
    let numshortblocks = numblocks - raw.len() % numblocks;
    let shortblockdatalen = raw.len() / numblocks - blockecclen;
    let rs = ReedSolomonGenerator::new(blockecclen);

    let mut result = Vec::with_capacity(numdata);
    for i in 0..numblocks {
        let datlen = shortblockdatalen + usize::from(i >= numshortblocks);
        let block: Vec<u8> = (0..datlen)
            .map(|j| {
                if j < shortblockdatalen {
                    raw[j * numblocks + i]
                } else {
                    raw[shortblockdatalen * numblocks + i - numshortblocks]
                }
            })
            .collect();
        let ecc: Vec<u8> = (0..blockecclen)
            .map(|j| raw[numdata + j * numblocks + i])
            .collect();
        assert_eq!(rs.compute_remainder(&block), ecc, "block {} ECC mismatch", i);
        result.extend(block);
    }
    result
}

struct BitReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl BitReader<'_> {
    fn remaining(&self) -> usize {
        self.bytes.len() * 8 - self.pos
    }

    fn read(&mut self, len: u8) -> u32 {
        let mut result = 0;
        for _ in 0..len {
            let bit = (self.bytes[self.pos >> 3] >> (7 - (self.pos & 7))) & 1;
            result = (result << 1) | u32::from(bit);
            self.pos += 1;
        }
        result
    }
}

/// Parses the data bit stream into the payload bytes. ECI designators are skipped.
fn parse_payload(data: &[u8], ver: Version) -> Vec<u8> {
    let charset = ALPHANUMERIC_CHARSET.as_bytes();
    let mut r = BitReader { bytes: data, pos: 0 };
    let mut out = Vec::new();
    while r.remaining() >= 4 {
        let mode = r.read(4);
        let ccbits = |m: QrSegmentMode| m.num_char_count_bits(ver);
        match mode {
            0x0 => break,
            0x1 => {
                let mut count = r.read(ccbits(QrSegmentMode::Numeric));
                while count > 0 {
                    let n = count.min(3);
                    let v = r.read(n as u8 * 3 + 1);
                    out.extend(format!("{:0width$}", v, width = n as usize).bytes());
                    count -= n;
                }
            }
            0x2 => {
                let mut count = r.read(ccbits(QrSegmentMode::Alphanumeric));
                while count >= 2 {
                    let v = r.read(11) as usize;
                    out.push(charset[v / 45]);
                    out.push(charset[v % 45]);
                    count -= 2;
                }
                if count == 1 {
                    out.push(charset[r.read(6) as usize]);
                }
            }
            0x4 => {
                let count = r.read(ccbits(QrSegmentMode::Byte));
                out.extend((0..count).map(|_| r.read(8) as u8));
            }
            0x7 => {
                let first = r.read(8);
                if first & 0x80 == 0x80 {
                    r.read(if first & 0x40 == 0 { 8 } else { 16 });
                }
            }
            other => panic!("unexpected mode indicator {:#x}", other),
        }
    }
    out
}

/// Reads a finished symbol back into its payload, checking the format information and
/// every block's error correction codewords along the way.
fn decode(qr: &QrCode) -> Vec<u8> {
    let (ecl, mask) = read_format(qr);
    assert_eq!(ecl, qr.error_correction_level());
    assert_eq!(mask, qr.mask());
    let raw = read_raw_codewords(qr, ecl, mask);
    let data = deinterleave(&raw, qr.version(), ecl);
    parse_payload(&data, qr.version())
}

/// Deterministic pseudo-random bytes.
fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

#[test]
fn test_round_trip_hello_world() {
    let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Low).unwrap();
    assert_eq!(qr.version(), Version::new(1));
    assert_eq!(qr.size(), 21);
    assert_eq!(decode(&qr), b"HELLO WORLD".to_vec());
}

#[test]
fn test_round_trip_text() {
    let texts = [
        "",
        "0",
        "31415926535897932384626433832795028841971693993751",
        "HTTPS://EXAMPLE.COM/A-B/C:D $5 10% *+",
        "Hello, wörld! 🌍",
        "The quick brown fox jumps over the lazy dog. 0123456789",
    ];
    for text in texts {
        for ecl in ALL_ECC {
            let qr = QrCode::encode_text(text, ecl).unwrap();
            assert!(qr.error_correction_level() >= ecl);
            assert_eq!(decode(&qr), text.as_bytes().to_vec(), "text {:?}", text);
        }
    }
}

#[test]
fn test_round_trip_large_binary() {
    for (len, ecl) in [(300, QrCodeEcc::High), (1200, QrCodeEcc::Quartile), (2953, QrCodeEcc::Low)] {
        let data = noise(len, len as u32);
        let qr = QrCode::encode_binary(&data, ecl).unwrap();
        assert_eq!(decode(&qr), data);
    }
}

#[test]
fn test_round_trip_every_fixed_mask() {
    let segs = QrSegment::make_segments("MASKED 12345");
    for m in 0..8 {
        let qr = QrCode::encode_segments_advanced(
            &segs,
            QrCodeEcc::Medium,
            Version::new(7),
            Version::MAX,
            Some(Mask::new(m)),
            true,
        )
        .unwrap();
        assert_eq!(qr.version(), Version::new(7));
        assert_eq!(qr.mask(), Mask::new(m));
        assert_eq!(decode(&qr), b"MASKED 12345".to_vec());
    }
}

#[test]
fn test_round_trip_eci_and_mixed_segments() {
    let segs = vec![
        QrSegment::make_eci(26).unwrap(),
        QrSegment::make_bytes("héllo ".as_bytes()),
        QrSegment::make_alphanumeric("ABC").unwrap(),
        QrSegment::make_numeric("0042").unwrap(),
    ];
    let qr = QrCode::encode_segments(&segs, QrCodeEcc::Low).unwrap();
    assert_eq!(decode(&qr), "héllo ABC0042".as_bytes().to_vec());
}

#[test]
fn test_hello_world_1m_codewords() {
    let segs = [QrSegment::make_alphanumeric("HELLO WORLD").unwrap()];
    let (data, ecl, ver) = QrCode::encode_segments_to_codewords(
        &segs,
        QrCodeEcc::Medium,
        Version::MIN,
        Version::MIN,
        false,
    )
    .unwrap();
    assert_eq!(ecl, QrCodeEcc::Medium);
    assert_eq!(ver, Version::new(1));
    assert_eq!(
        data,
        vec![32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17]
    );

    let all = QrCode::add_ecc_and_interleave(&data, ver, ecl);
    assert_eq!(&all[..16], &data[..]);
    assert_eq!(&all[16..], &[196, 35, 39, 119, 235, 215, 231, 226, 93, 23]);
}

#[test]
fn test_boost_raises_ecc() {
    // 74 data bits: fits 1-Q (104 bits) but not 1-H (72 bits)
    let qr = QrCode::encode_text("HELLO WORLD", QrCodeEcc::Low).unwrap();
    assert_eq!(qr.error_correction_level(), QrCodeEcc::Quartile);

    let segs = QrSegment::make_segments("HELLO WORLD");
    let qr = QrCode::encode_segments_advanced(
        &segs,
        QrCodeEcc::Low,
        Version::MIN,
        Version::MAX,
        None,
        false,
    )
    .unwrap();
    assert_eq!(qr.error_correction_level(), QrCodeEcc::Low);
}

#[test]
fn test_data_too_long_within_version_range() {
    let text = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123";
    let segs = QrSegment::make_segments(text);
    let err = QrCode::encode_segments_advanced(
        &segs,
        QrCodeEcc::Low,
        Version::MIN,
        Version::MIN,
        None,
        true,
    )
    .unwrap_err();
    // 4 + 9 + 15 * 11 bits against 19 data codewords
    assert_eq!(err, QrError::DataTooLong(DataTooLong::DataOverCapacity(178, 152)));
}

#[test]
fn test_segment_too_long() {
    // 1024 digits overflow the 10-bit count field of versions 1-9
    let digits = "7".repeat(1024);
    let segs = [QrSegment::make_numeric(&digits).unwrap()];
    let err = QrCode::encode_segments_advanced(
        &segs,
        QrCodeEcc::Low,
        Version::MIN,
        Version::new(9),
        None,
        true,
    )
    .unwrap_err();
    assert_eq!(err, QrError::DataTooLong(DataTooLong::SegmentTooLong));
}

#[test]
fn test_version_40_capacity_limit() {
    assert!(QrCode::encode_binary(&[0u8; 2953], QrCodeEcc::Low).is_ok());
    assert_eq!(
        QrCode::encode_binary(&[0u8; 2954], QrCodeEcc::Low).unwrap_err(),
        QrError::DataTooLong(DataTooLong::DataOverCapacity(23652, 23648))
    );
}

#[test]
fn test_invalid_arguments() {
    assert!(matches!(
        QrCode::encode_segments_advanced(
            &[],
            QrCodeEcc::Low,
            Version::new(3),
            Version::new(2),
            None,
            true
        ),
        Err(QrError::InvalidArgument(_))
    ));
    assert!(matches!(
        QrCode::encode_codewords(Version::new(1), QrCodeEcc::Low, &[0u8; 18], None),
        Err(QrError::InvalidArgument(_))
    ));
    assert!(Version::try_from(0u8).is_err());
    assert!(Version::try_from(41u8).is_err());
    assert_eq!(Version::try_from(40u8), Ok(Version::MAX));
    assert!(Mask::try_from(8u8).is_err());
    assert_eq!(Mask::try_from(7u8), Ok(Mask::new(7)));
}

#[test]
#[should_panic(expected = "Version number out of range")]
fn test_version_new_panics() {
    let _ = Version::new(41);
}

#[test]
fn test_get_module_out_of_range() {
    let qr = QrCode::encode_text("0", QrCodeEcc::Low).unwrap();
    assert!(qr.get_module(0, 0));
    assert!(!qr.get_module(-1, 0));
    assert!(!qr.get_module(0, -1));
    assert!(!qr.get_module(qr.size(), 0));
    assert!(!qr.get_module(0, qr.size()));
}

#[test]
fn test_function_patterns() {
    let qr = QrCode::encode_text("FUNCTION PATTERNS", QrCodeEcc::Medium).unwrap();
    let size = qr.size();
    // Finder rings around each of the three corners
    for (cx, cy) in [(3, 3), (size - 4, 3), (3, size - 4)] {
        assert!(qr.get_module(cx, cy));
        assert!(qr.get_module(cx - 3, cy - 3));
        assert!(!qr.get_module(cx - 2, cy));
        assert!(qr.get_module(cx + 1, cy + 1));
    }
    assert!(!qr.get_module(7, 7));
    // Timing patterns between the finders
    for i in 8..size - 8 {
        assert_eq!(qr.get_module(i, 6), i % 2 == 0);
        assert_eq!(qr.get_module(6, i), i % 2 == 0);
    }
    assert!(qr.get_module(8, size - 8));
}

#[test]
fn test_version_information_blocks() {
    // 892 bits: over the 108 codewords of 6-M, within the 124 of 7-M
    let qr = QrCode::encode_binary(&[0u8; 110], QrCodeEcc::Medium).unwrap();
    assert_eq!(qr.version(), Version::new(7));
    let size = qr.size();
    let mut top_right = 0u32;
    let mut bottom_left = 0u32;
    for i in 0..18 {
        let (a, b) = (size - 11 + i % 3, i / 3);
        top_right |= u32::from(qr.get_module(a, b)) << i;
        bottom_left |= u32::from(qr.get_module(b, a)) << i;
    }
    assert_eq!(top_right, 0x07c94);
    assert_eq!(bottom_left, 0x07c94);
    assert_eq!(version_bits(Version::MAX), 0x28c69);
}

#[test]
fn test_format_bits_known_values() {
    assert_eq!(format_bits(QrCodeEcc::Medium, Mask::new(0)), 0x5412);
    assert_eq!(format_bits(QrCodeEcc::Low, Mask::new(4)), 0b110011000101111);
}

#[test]
fn test_function_modules_leave_raw_data_area() {
    for v in 1..=40 {
        let ver = Version::new(v);
        let mut canvas = Canvas::new(ver, QrCodeEcc::Low);
        canvas.draw_function_patterns();
        let free = canvas.isfunction.iter().filter(|&&f| !f).count();
        assert_eq!(free, QrCode::get_num_raw_data_modules(ver), "version {}", v);
    }
}

#[test]
fn test_alignment_pattern_positions() {
    assert_eq!(Version::new(1).alignment_pattern_positions(), Vec::<i32>::new());
    assert_eq!(Version::new(2).alignment_pattern_positions(), vec![6, 18]);
    assert_eq!(Version::new(7).alignment_pattern_positions(), vec![6, 22, 38]);
    assert_eq!(
        Version::new(32).alignment_pattern_positions(),
        vec![6, 34, 60, 86, 112, 138]
    );
    assert_eq!(
        Version::new(40).alignment_pattern_positions(),
        vec![6, 30, 58, 86, 114, 142, 170]
    );
}

#[test]
fn test_mask_is_self_inverse() {
    for v in 1..=40 {
        let ver = Version::new(v);
        let mut canvas = Canvas::new(ver, QrCodeEcc::Quartile);
        canvas.draw_function_patterns();
        let data = noise(QrCode::get_num_raw_data_modules(ver) / 8, u32::from(v));
        canvas.draw_codewords(&data);
        let before = canvas.modules.clone();
        for m in 0..8 {
            let mask = Mask::new(m);
            canvas.apply_mask(mask);
            assert_ne!(canvas.modules, before, "mask {} changed nothing", m);
            for (i, &isfunc) in canvas.isfunction.iter().enumerate() {
                if isfunc {
                    assert_eq!(canvas.modules[i], before[i]);
                }
            }
            canvas.apply_mask(mask);
            assert!(canvas.modules == before, "mask {} not undone at version {}", m, v);
        }
    }
}

#[test]
fn test_auto_mask_picks_first_minimum() {
    let inputs: [(&str, QrCodeEcc); 4] = [
        ("HELLO WORLD", QrCodeEcc::Low),
        ("https://www.example.com/some/longer/path?query=1", QrCodeEcc::Medium),
        ("000000000000000000000000000000000000000000", QrCodeEcc::High),
        ("Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.", QrCodeEcc::Quartile),
    ];
    for (text, ecl) in inputs {
        let segs = QrSegment::make_segments(text);
        let auto = QrCode::encode_segments(&segs, ecl).unwrap();
        let penalties: Vec<i32> = (0..8)
            .map(|m| {
                QrCode::encode_segments_advanced(
                    &segs,
                    ecl,
                    Version::MIN,
                    Version::MAX,
                    Some(Mask::new(m)),
                    true,
                )
                .unwrap()
                .penalty_score()
            })
            .collect();
        let min = *penalties.iter().min().unwrap();
        let first = penalties.iter().position(|&p| p == min).unwrap();
        assert_eq!(auto.mask(), Mask::new(first as u8), "text {:?}", text);
        assert_eq!(auto.penalty_score(), min);
        assert!(penalties.iter().all(|p| (0..=MAX_PENALTY).contains(p)));
    }
}

#[test]
fn test_penalty_within_bounds_across_versions() {
    for len in [0usize, 50, 400, 1000, 2000] {
        let qr = QrCode::encode_binary(&noise(len, 7), QrCodeEcc::Low).unwrap();
        let penalty = qr.penalty_score();
        assert!((0..=MAX_PENALTY).contains(&penalty), "penalty {}", penalty);
    }
}

#[test]
fn test_capacity_is_monotonic() {
    for ecl in ALL_ECC {
        for v in 1..40 {
            assert!(
                QrCode::get_num_data_codewords(Version::new(v + 1), ecl)
                    >= QrCode::get_num_data_codewords(Version::new(v), ecl)
            );
        }
    }
    for v in 1..=40 {
        let ver = Version::new(v);
        let caps: Vec<usize> = ALL_ECC
            .iter()
            .map(|&ecl| QrCode::get_num_data_codewords(ver, ecl))
            .collect();
        assert!(caps.windows(2).all(|w| w[0] > w[1]), "version {}: {:?}", v, caps);
    }
}

#[test]
fn test_size_matches_version() {
    for len in [1usize, 100, 500, 1500] {
        let qr = QrCode::encode_binary(&noise(len, 3), QrCodeEcc::Medium).unwrap();
        assert_eq!(qr.size(), i32::from(qr.version().value()) * 4 + 17);
        assert_eq!(qr.size(), qr.version().size());
    }
}

#[test]
fn test_ecc_names() {
    assert_eq!("HIGH".parse::<QrCodeEcc>(), Ok(QrCodeEcc::High));
    assert_eq!("quartile".parse::<QrCodeEcc>(), Ok(QrCodeEcc::Quartile));
    assert!("extreme".parse::<QrCodeEcc>().is_err());
    for ecl in ALL_ECC {
        assert_eq!(ecl.to_string().parse::<QrCodeEcc>(), Ok(ecl));
    }
    assert_eq!(QrCodeEcc::default(), QrCodeEcc::Medium);
}
