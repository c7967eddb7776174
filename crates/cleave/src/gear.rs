//! Gear table constants and keyed-table derivation.
//!
//! The gear table supplies the per-byte contribution of the rolling content
//! hash. One canonical table ships with the library; a chunker configured
//! with a key owns a private table derived from it, so two parties holding
//! different keys see unrelated chunk boundaries on the same bytes.

use crate::error::OptionsError;

/// A per-byte hash contribution table.
pub type GearTable = [u64; 256];

/// Number of bytes a key must have for keyed derivation.
pub const KEY_LEN: usize = 32;

/// The canonical gear table.
///
/// Fixed pseudorandom 64-bit constants, identical across builds; the table
/// is part of the chunk-boundary contract, so changing any entry changes
/// cutpoints on existing data. Entry 0 is zero: a run of zero bytes keeps
/// the rolling fingerprint at zero, which makes zero streams cut at exactly
/// the minimum chunk size.
#[rustfmt::skip]
pub const GEAR: GearTable = [
    0x0000000000000000, 0xb9275c26e3a749ba, 0x366dd8d16774ac19, 0x5ac8d6d0df2dac52,
    0x4e85de9ddf890181, 0xf95e9c3c521f1b81, 0x1ca1fa1da261e16a, 0x2b43198ce47defc8,
    0xdc141f8632a65a58, 0x2f8bbb1c9d13cf34, 0x52cbab4cc6f37c1f, 0xac5f01f8ff16b9e1,
    0x5264396071333f0f, 0xb31d22d46bf7b71f, 0xca7f2910e027cd22, 0xdf9194e45af1fad9,
    0xa8c69c83a14807c6, 0x13a47e55fab78c61, 0x7713463399ab6045, 0xe2468a7201c3cc44,
    0x0d2be078163a7a70, 0x40d9d09ccaeda12d, 0x9c9ffbee2cc2486a, 0x67c6031f8e16652e,
    0x92251d02cda64248, 0xedf80ee73ae08346, 0xb65b9162fe3ade81, 0xf38fa34715016250,
    0x46ac901832224558, 0x34c2f42aec5d6b0e, 0x76c1caa9d559e1bd, 0xa81fe7ff91529b5b,
    0x107c2843e86b77b7, 0x2a016a3d71a11f9d, 0x4c80f7cb09ba17f4, 0xbd79bffe427e2b28,
    0xffc42d9a2deff9f3, 0x3bac52a3084f21ac, 0x209332dbf87d33fa, 0x257e7d035921a0d7,
    0xade60be37c6861f8, 0x23f4e1d5a0383b83, 0x48692bbd66a18910, 0x195ab128a88882f0,
    0x87106d572af7fe0a, 0x3f9f5fca9c71df26, 0x8b87be1f84a259e7, 0xc855ef2c51adde9a,
    0x7cd17acefc418028, 0xbb1e48bc91ac25bd, 0x68386a77e9dc0ef6, 0x4fcf260a4af10ef2,
    0x56c27abee2f208f7, 0x31c8bc46381d5d0f, 0x70836b9b4c387a6b, 0x279a8bcfdb8a7086,
    0xa73959af7b67a209, 0xb7fd90a11faddabf, 0xba47c3abc130e4e2, 0x90e6f236474be2cd,
    0x930a0d818430d0b9, 0xf10488a0e094474f, 0x0f5c9001f929152c, 0x03edcd5b879f93da,
    0xbf7e8e52315b2a57, 0x2a69cde03c89c7bd, 0xff13f7fb25f9a19a, 0xc02aeaf61240a57d,
    0x0c111231f2968e21, 0x92c17e000d2d9839, 0xe2fafe07cf86449d, 0x6b1af29bde164500,
    0xef328d3ace2ebf32, 0x641ebe1b73c8e841, 0x12d4a9ad91136274, 0x4f6c9e5400c561a7,
    0x42bb9fd875abf12c, 0x1050e3725fe7108e, 0xecc9b4a194216703, 0x3755f00d417b1b8c,
    0x82891ce179158263, 0xb9a770a1ec454b32, 0xb9312c52096268f1, 0xcb1b6bb042240bb6,
    0x7d41af89bbe7e0f6, 0x64b80e3be76061d7, 0x523f5013d30d2b7c, 0x39dd287b8c78e0ba,
    0x0aabde8db49d36ae, 0x701d8ac197a0bca0, 0x8a7760161dd26df1, 0x1cfbdcf55ee0ff8f,
    0xecfa2c391ed3eb20, 0xe22dcc047f537fef, 0xf9b3ed654c570335, 0x6be296e33c47a88a,
    0xfd8fe0de4b73616a, 0xae8c26c5580646dd, 0x51d2436374c0db1b, 0x1a4c09b010bd7b88,
    0x4b83439acab69a76, 0x571ef2944bfbd0d4, 0x9b1935da81ce8853, 0x8954460ce6760f1e,
    0x03882dfba3a4319b, 0x03477e7343c6b3b6, 0x651356e8ff773cee, 0x9a482ada183792ef,
    0xfc9161cdc7b95c7f, 0x4e154561083997c2, 0x8b371685cf42dfdb, 0x8cb0a0b2dea2712f,
    0xffb4c98f19337b50, 0xa648e7d5c7c10bf0, 0x18fb934e79354a82, 0xa7725e31ce063e43,
    0x53314749f23182f8, 0xc34d3fd0b7381b5b, 0x27e3b1b070425b01, 0x2d2ec9e4aa12bf9d,
    0x613e87969e31c539, 0xc0b509f429c95e84, 0x9fd68900dbcc40c0, 0x93e5147fcd900804,
    0x318fca37cc3e2a3d, 0x16798ca01a41010d, 0x4cd3d03b98c074dd, 0xe19173771a9f8a5d,
    0xeb20d687480545c7, 0xd3d62548843561dc, 0x4226d36aa6911e14, 0x6b7959168fae6277,
    0xd242ddbe4dfca086, 0x4f7f5ee4eeef5b1d, 0x16506e572e76a668, 0x8a63ec226b1e2385,
    0xf6301c5035a36ca2, 0xfe156194fb47cb2d, 0x5cb0f6ce90182d1a, 0x6db137037efbf3d8,
    0x63193d3603349b18, 0xef0d433f1c8362ac, 0x97ba8eb6b4536a79, 0xfc9257d9810d7686,
    0x41fb2b3a3eff57ee, 0xd09d6c89c3180ca2, 0x4d4239cb4e7ab1aa, 0x20860f52d7444090,
    0x627d6ec61da4d614, 0x51b00eb833afa495, 0xe7b5fcf3eabdf0b1, 0xe34e061a238c0655,
    0xd516db421cfbf463, 0x48b3e8a1c98ded69, 0x7327f8b004bf97a3, 0x46cd9fd558d8b8b4,
    0x2e67ae4cdc8c2ea4, 0x75be75c7182a9181, 0x461cbbbca0338fb7, 0xe7f9ff23e84ea4d9,
    0xd798c2ce485e9f88, 0xfa4f8e7df280407a, 0xd2ce2a755cfd2afd, 0xb1c9d2c2e4c5a5ec,
    0x0eea06bb6622c29a, 0x44578b5cc69e3eee, 0x3a42f3d437c953ac, 0xe0fe2f41fe8fb0cb,
    0xa212807ab9f2d22d, 0xb91f86ff4d9c212a, 0xf5c684ca6b79bfc7, 0xf52b1f8d20bd8856,
    0x7ede88589432f1ae, 0xa5f0c2334e58b2bc, 0xf4d1f0d95fa43ef3, 0xdc2e76f52f33e2df,
    0x57b2a163570e5f63, 0x30cbd7314c494dc6, 0x3a84185cee3f0fb6, 0x537530551f24edb4,
    0xb849444c1e646d61, 0x9d825662e6e09d93, 0xad1a87b7694a17c2, 0x8c2dbda317d00cf9,
    0xb44626aaaa99d86b, 0xbcb941eac66e4eac, 0xbaf70789e7d6df44, 0x3adccbdbafe1ed46,
    0xad98149be339dcfb, 0xda7db851c1aaca77, 0x7b985af71fe4d301, 0x3d8500b585159809,
    0x0a94a45952c8e34d, 0xc3f3cc4cfb8b71e9, 0xc53b0c75464e8499, 0x1f4c8dd392af570f,
    0xbfc62134ccc5ae90, 0x80754d45872de1b5, 0xed1e7ba0682ce647, 0x2ae411a529f3c01e,
    0x4c7a3c90b0ae9556, 0xc94dd85478397cb6, 0x6e8046f5cc635762, 0xeb09a6a2f1ba3be2,
    0x3532e29c8495d6a5, 0x4d7ab8d39356ed45, 0x66535da7db3728d0, 0x17bd14b77eff53e9,
    0x8f2cf876400f2b54, 0x7c5024d85882576c, 0xeb7e5da689a308fe, 0x0c3a8149a119eb85,
    0x46be754a9c352fc2, 0x5c5f4cdb7df1f2b2, 0x62a055df1f064fb2, 0x554ff1da139c96ef,
    0xa262fbbd716380c7, 0x94b83c8a8bed594b, 0xb8fcf41fdfa3d40c, 0xbdec66dbe2954583,
    0xf1e609317c0f0ed1, 0x05a6e0815b6fbce5, 0x777f945611ddbfaa, 0x5723030f16443d6f,
    0xcecd786e7d27345a, 0x91afaa0cce0a8bfa, 0xca64d14f99ebd5b0, 0x883979226efd010e,
    0xb8b436dcbb44eea2, 0xce44c845e0313ce9, 0xd665f94ec049fb34, 0x129042333a19a120,
    0xd6f78516c4436d64, 0x8cfd7ae9a7ae43fc, 0x8bbf2b1787c5f750, 0x013bfb3adfc30c76,
    0xd909774775accfa0, 0x13cc78f236d38cf3, 0x827dbcb8370017ba, 0x6a1195f992123bdf,
    0x27582450ecad6439, 0x6a8bb200ad9c7da1, 0xd32d7b93d8d5cf36, 0xbd0f0301d630af45,
    0xaf719fa500036e13, 0xaedb290890c4c691, 0x04b79e822592c967, 0x968bbda2dffb4528,
    0xda5ab41a9a7f9faf, 0x904a0d6ee92a1733, 0x342321d0dfbce326, 0x67524a541ff84d4f,
    0x9086d24fe3495aa8, 0xcf779f19f4a2db9d, 0x27b848157528a4f5, 0x21554a5b4fad9ec7,
];

/// Derives a keyed gear table from the canonical one.
///
/// The baseline entries are fed little-endian into a keyed BLAKE3 hasher and
/// the table is rebuilt from the extendable output, 8 little-endian bytes
/// per entry. The key must be exactly [`KEY_LEN`] bytes.
pub fn derive_keyed_table(key: &[u8]) -> Result<GearTable, OptionsError> {
    let key: &[u8; KEY_LEN] = key.try_into().map_err(|_| {
        OptionsError::KeyDerivation(format!("key must be {KEY_LEN} bytes, got {}", key.len()))
    })?;

    let mut hasher = blake3::Hasher::new_keyed(key);
    for entry in GEAR {
        hasher.update(&entry.to_le_bytes());
    }

    let mut stream = [0u8; 256 * 8];
    hasher.finalize_xof().fill(&mut stream);

    let mut table = [0u64; 256];
    for (entry, bytes) in table.iter_mut().zip(stream.chunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(bytes);
        *entry = u64::from_le_bytes(word);
    }
    Ok(table)
}
