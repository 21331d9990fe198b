use huffpack::{
    compress, decompress, BitReader, CodeTable, CompressedData, FrequencyTable, HuffmanCodec,
    HuffmanError, HuffmanTree,
};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

#[quickcheck]
fn roundtrip_any_nonempty_input(data: Vec<u8>) -> TestResult {
    if data.is_empty() {
        return TestResult::discard();
    }
    let artifact = compress(&data).unwrap();
    TestResult::from_bool(decompress(&artifact).unwrap() == data)
}

#[quickcheck]
fn codes_are_prefix_free(data: Vec<u8>) -> TestResult {
    let tree = match HuffmanTree::from_bytes(&data) {
        Ok(tree) => tree,
        Err(_) => return TestResult::discard(),
    };
    let table = CodeTable::from_tree(&tree);
    if table.len() < 2 {
        return TestResult::discard();
    }
    TestResult::from_bool(table.is_prefix_free())
}

#[quickcheck]
fn bit_count_is_weighted_code_length(data: Vec<u8>) -> TestResult {
    if data.is_empty() {
        return TestResult::discard();
    }
    let codec = HuffmanCodec::from_bytes(&data).unwrap();
    let mut packed = Vec::new();
    let bits = codec.encode_to(&data, &mut packed).unwrap();
    let expected = codec
        .code_table()
        .encoded_bit_length(&FrequencyTable::from_bytes(&data))
        .unwrap();
    TestResult::from_bool(bits == expected && packed.len() as u64 == bits.div_ceil(8))
}

#[quickcheck]
fn tree_construction_is_deterministic(data: Vec<u8>) -> TestResult {
    if data.is_empty() {
        return TestResult::discard();
    }
    let mut shuffled = data.clone();
    shuffled.reverse();
    // same counts, different order: identical tree
    TestResult::from_bool(
        HuffmanTree::from_bytes(&data).unwrap() == HuffmanTree::from_bytes(&shuffled).unwrap(),
    )
}

#[quickcheck]
fn repeated_symbol_roundtrip(symbol: u8, count: u16) -> TestResult {
    if count == 0 {
        return TestResult::discard();
    }
    let data = vec![symbol; count as usize];
    let artifact = CompressedData::deserialize(&compress(&data).unwrap()).unwrap();
    TestResult::from_bool(
        artifact.bit_count() == count as u64
            && HuffmanCodec::decompress(&artifact).unwrap() == data,
    )
}

#[test]
fn abracadabra_literal_scenario() {
    let data = b"abracadabra";

    let frequencies = FrequencyTable::from_bytes(data);
    let counts: Vec<_> = frequencies.iter().map(|e| (e.symbol, e.count)).collect();
    assert_eq!(
        counts,
        vec![(b'a', 5), (b'b', 2), (b'c', 1), (b'd', 1), (b'r', 2)]
    );

    let codec = HuffmanCodec::from_frequencies(&frequencies).unwrap();
    let codes: Vec<_> = codec
        .code_table()
        .iter()
        .map(|(symbol, code)| (symbol, code.to_string()))
        .collect();
    assert_eq!(
        codes,
        vec![
            (b'a', "0".to_string()),
            (b'b', "110".to_string()),
            (b'c', "100".to_string()),
            (b'd', "101".to_string()),
            (b'r', "111".to_string()),
        ]
    );

    let compressed = codec.compress(data).unwrap();
    assert_eq!(compressed.bit_count(), 23);
    assert_eq!(compressed.compressed_bits, vec![0x6E, 0x8A, 0xDC]);
    assert_eq!(HuffmanCodec::decompress(&compressed).unwrap(), data.to_vec());
}

#[test]
fn single_symbol_input() {
    let codec = HuffmanCodec::from_bytes(b"aaaa").unwrap();
    assert_eq!(codec.code_table().len(), 1);
    assert_eq!(
        codec.code_table().get(b'a').map(|c| c.to_string()),
        Some("1".to_string())
    );
    assert_eq!(decompress(&compress(b"aaaa").unwrap()).unwrap(), b"aaaa");
}

#[test]
fn empty_input_policy() {
    assert!(matches!(compress(b""), Err(HuffmanError::EmptyInput)));
    assert!(matches!(
        HuffmanCodec::from_bytes(b""),
        Err(HuffmanError::EmptyInput)
    ));

    let sample_codec = HuffmanCodec::from_bytes(b"abc").unwrap();
    assert!(matches!(
        sample_codec.compress(b""),
        Err(HuffmanError::EmptyInput)
    ));
}

#[test]
fn padding_never_yields_trailing_symbol() {
    // 'a' has the code 0, so every pad bit would decode as 'a'
    for len in 1..=16 {
        let data: Vec<u8> = b"abracadabra".iter().cycle().take(len).copied().collect();
        let codec = HuffmanCodec::from_bytes(b"abracadabra").unwrap();
        let compressed = codec.compress(&data).unwrap();
        assert_eq!(HuffmanCodec::decompress(&compressed).unwrap(), data);
    }
}

#[test]
fn optimal_against_exhaustive_small_distribution() {
    // Optimal prefix-code cost for weights {1, 1, 2, 3, 5} is 25:
    // merges 1+1=2, 2+2=4, 3+4=7, 5+7=12 sum to 2+4+7+12.
    let frequencies: FrequencyTable = [(b'a', 1), (b'b', 1), (b'c', 2), (b'd', 3), (b'e', 5)]
        .into_iter()
        .collect();
    let codec = HuffmanCodec::from_frequencies(&frequencies).unwrap();
    let cost = codec.code_table().encoded_bit_length(&frequencies).unwrap();
    assert_eq!(cost, 25);

    // Every full binary tree shape over five leaves, with the heaviest symbols
    // on the shallowest leaves, costs at least as much.
    let mut weights = [5u64, 3, 2, 1, 1];
    weights.sort_unstable_by(|a, b| b.cmp(a));
    for depths in [[1, 2, 3, 4, 4], [2, 2, 2, 3, 3], [1, 3, 3, 3, 3]] {
        let alternative: u64 = weights.iter().zip(depths).map(|(w, d)| w * d).sum();
        assert!(alternative >= cost);
    }
}

#[test]
fn corrupt_payload_is_detected() {
    let data = b"the rain in spain stays mainly in the plain";
    let mut compressed = HuffmanCodec::from_bytes(data).unwrap().compress(data).unwrap();
    compressed.header.bit_count -= 1;
    let err = HuffmanCodec::decompress(&compressed).unwrap_err();
    assert_eq!(err.kind(), "corrupt_stream");
}

#[test]
fn lazy_decoder_yields_symbols_one_at_a_time() {
    let data = b"lazy";
    let codec = HuffmanCodec::from_bytes(data).unwrap();
    let mut packed = Vec::new();
    let bits = codec.encode_to(data, &mut packed).unwrap();

    let mut decoder = codec.decoder(BitReader::with_bit_limit(&packed[..], bits));
    assert_eq!(decoder.next().unwrap().unwrap(), b'l');
    assert_eq!(decoder.next().unwrap().unwrap(), b'a');
    assert_eq!(decoder.next().unwrap().unwrap(), b'z');
    assert_eq!(decoder.next().unwrap().unwrap(), b'y');
    assert!(decoder.next().is_none());
    assert_eq!(decoder.bits_read(), bits);
}
