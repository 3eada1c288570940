use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join("huffpack-demo");
    fs::create_dir_all(&dir)?;

    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    let input = dir.join("sample.txt");
    fs::write(&input, sample_text)?;
    println!("Created sample file: {} bytes", sample_text.len());

    // sample.txt -> sample.huff
    let packed = huffpack::huff_file_name(&input.to_string_lossy());
    let summary = huffpack::compress(&input, &packed)?;
    println!(
        "Compressed to: {} bytes ({:.1}% of original)",
        summary.output_bytes,
        summary.ratio() * 100.0
    );

    let restored = dir.join("decompressed.txt");
    huffpack::decompress(&packed, &restored)?;

    let decompressed_text = fs::read_to_string(&restored)?;
    if sample_text != decompressed_text {
        return Err("Decompression verification failed".into());
    }
    println!("Decompression successful! Data matches exactly.");

    fs::remove_dir_all(&dir)?;
    Ok(())
}
