//! Property tests for the codec stages.

use braidcodec::dmc::{self, Predictor};
use braidcodec::envelope::{self, KeyMaterial};
use braidcodec::{extension_for, type_for, DmcConfig, FileCodec, FileType};
use proptest::collection::vec;
use proptest::prelude::*;

fn password() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 !-~]{1,40}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_dmc_roundtrip(data in vec(any::<u8>(), 0..2048)) {
        let packed = dmc::compress(&data).unwrap();
        prop_assert_eq!(dmc::decompress(&packed).unwrap(), data);
    }

    #[test]
    fn prop_dmc_roundtrip_skewed(data in vec(prop_oneof![Just(0u8), Just(0xFFu8), any::<u8>()], 0..512)) {
        let packed = dmc::compress(&data).unwrap();
        prop_assert_eq!(dmc::decompress(&packed).unwrap(), data);
    }

    #[test]
    fn prop_dmc_ignores_trailing_zeros(data in vec(any::<u8>(), 0..256), pad in 0usize..16) {
        let mut packed = dmc::compress(&data).unwrap();
        packed.resize(packed.len() + pad, 0);
        prop_assert_eq!(dmc::decompress(&packed).unwrap(), data);
    }

    #[test]
    fn prop_envelope_roundtrip_modulo_padding(data in vec(any::<u8>(), 0..512), pw in password()) {
        let keys = KeyMaterial::derive(&pw);
        let stored = envelope::encrypt(&data, &keys).unwrap();
        let plain = envelope::decrypt(&stored, &keys).unwrap();
        prop_assert_eq!(plain.len(), data.len().div_ceil(16) * 16);
        prop_assert_eq!(&plain[..data.len()], &data[..]);
        prop_assert!(plain[data.len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn prop_wrong_password_rejected(data in vec(any::<u8>(), 0..128), a in password(), b in password()) {
        prop_assume!(a != b);
        let stored = envelope::encrypt(&data, &KeyMaterial::derive(&a)).unwrap();
        let result = envelope::decrypt(&stored, &KeyMaterial::derive(&b));
        prop_assert!(result.is_err_and(|e| e.is_wrong_password()));
    }

    #[test]
    fn prop_codec_combined_roundtrip(data in vec(any::<u8>(), 0..1024), pw in password()) {
        let mut codec = FileCodec::new();
        codec.set_password(&pw);
        let both = FileType::COMPRESSED | FileType::ENCRYPTED;
        let stored = codec.encode(both, &data).unwrap();
        prop_assert_eq!(codec.decode(&stored).unwrap(), (both, data));
    }

    #[test]
    fn prop_type_for_ignores_stem(stem in "[a-z]{1,12}", bits in 0u8..4) {
        let t = FileType::from_bits(bits).unwrap();
        let name = format!("{}{}", stem, extension_for(t));
        prop_assert_eq!(type_for(&name), t);
    }

    #[test]
    fn prop_arena_never_exceeds_capacity(bits in vec(any::<bool>(), 0..20_000)) {
        let config = DmcConfig::new(128, 4, 0x100).unwrap();
        let mut model = Predictor::new(&config).unwrap();
        let capacity = model.capacity();
        for bit in bits {
            model.update(bit);
            prop_assert!(model.clones() <= config.clone_limit());
        }
        prop_assert_eq!(model.capacity(), capacity);
    }
}

#[test]
fn type_for_extension_idempotent() {
    for t in FileType::all() {
        assert_eq!(type_for(extension_for(t)), t);
    }
}
