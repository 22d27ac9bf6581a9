use rs_markov_core::model::language_model::LanguageModel;

const USAGE: &str = "Usage: rs-markov-exemple <CORPUS_FILE> <WINDOW_LENGTH> <TARGET_LENGTH>";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        println!("{USAGE}");
        std::process::exit(1);
    }

    // The corpus reader lives here, outside the model: a missing file fails
    // fast with the underlying I/O error.
    let corpus = std::fs::read_to_string(&args[1])?;
    let window_length: usize = args[2].parse()?;
    let target_length: usize = args[3].parse()?;

    // Seed the text with the first window of the corpus itself, so the
    // starting window is guaranteed to be known to the model.
    let initial_text: String = corpus.chars().take(window_length).collect();

    // A seeded model generates the same text on every run. Good for debugging.
    let mut seeded = LanguageModel::with_seed(window_length, 42)?;
    seeded.train(corpus.chars());
    println!("Seeded generation:\n{}\n", seeded.generate(&initial_text, target_length));

    // An unseeded model draws its seed from OS entropy. Good for production.
    let mut model = LanguageModel::new(window_length)?;
    model.train(corpus.chars());
    println!("Entropy generation:\n{}\n", model.generate(&initial_text, target_length));

    // Attempting a window length of 0 is rejected at construction.
    match LanguageModel::new(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Window length 0 is invalid: {e}"),
    }

    // Debugging dump of the trained map, one line per window. Only useful
    // for small corpora.
    if corpus.chars().count() <= 64 {
        println!("Trained map:\n{model}");
    }

    Ok(())
}
