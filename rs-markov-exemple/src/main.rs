use rs_markov_core::model::chain::MarkovChain;

const CORPUS: &str = "the cat sat on the mat the dog sat on the rug \
the cat saw the dog and the dog saw the cat";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Train a lenient chain from consecutive word pairs.
    // Tokenization lives here, on the host side; the chain only sees pairs.
    let mut chain = MarkovChain::new(false);
    let words: Vec<&str> = CORPUS.split_whitespace().collect();
    for pair in words.windows(2) {
        chain.add_transition(pair[0], pair[1])?;
    }

    // The matrix is derived lazily, on first read after training.
    println!("Transition probabilities out of 'the':");
    for (to, probability) in &chain.transition_matrix()["the"] {
        println!("  the -> {}: {:.3}", to, probability);
    }

    // Generate a short walk. The first call picks a random origin,
    // later calls continue from the last generated state.
    let mut walk = Vec::new();
    for _ in 0..8 {
        walk.push(chain.generate_state(None)?);
    }
    println!("Generated walk: {}", walk.join(" "));

    // Adding an absent identifier is rejected without changing the chain
    match chain.add_transition("", "x") {
        Ok(_) => println!("Should not happen"),
        Err(error) => println!("Rejected as expected: {}", error),
    }

    // Persist the chain (counts plus cursor) and restore it.
    let snapshot = chain.save();
    println!("Snapshot: {} bytes", snapshot.len());

    let mut restored = MarkovChain::load(&snapshot, chain.is_strict())?;
    println!("Restored cursor: {:?}", restored.last_state());
    println!("Continued walk: {}", restored.generate_state(None)?);

    // A strict chain refuses to leave a dead-end state instead of
    // restarting at random.
    let mut strict = MarkovChain::load(&snapshot, true)?;
    match strict.generate_state(Some("unknown")) {
        Ok(_) => println!("Should not happen"),
        Err(error) => println!("Strict mode: {}", error),
    }

    Ok(())
}
