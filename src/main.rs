fn main() -> Result<(), Box<dyn std::error::Error>> {
    penpal::cli::main()
}
