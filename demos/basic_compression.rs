use huffpack::{compress_file, decompress_file, CodecConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join("huffpack-demo");
    std::fs::create_dir_all(&dir)?;

    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    let input = dir.join("sample.txt");
    std::fs::write(&input, sample_text)?;
    println!("Created sample file: {} bytes", sample_text.len());

    let config = CodecConfig::default();
    let paths = config.output_paths(&input);

    let stats = compress_file(&input, &paths.compressed, &config)?;
    println!(
        "Compressed to: {} bytes ({:.1}% of original, {:.2} bits/symbol)",
        stats.compressed_bytes,
        stats.ratio() * 100.0,
        stats.bits_per_symbol()
    );

    decompress_file(&paths.compressed, &paths.decompressed, &config)?;
    let decompressed_text = std::fs::read_to_string(&paths.decompressed)?;

    if sample_text != decompressed_text {
        return Err("Decompression verification failed".into());
    }
    println!("Decompression successful! Data matches exactly.");

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
