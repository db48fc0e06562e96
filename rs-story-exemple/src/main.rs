use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;

use rs_story_core::io::read_lines;
use rs_story_core::model::chain::MarkovChain;

/// Train a word-level Markov chain on text files and generate a story.
#[derive(Parser)]
#[command(name = "rs-story")]
struct Args {
    /// Corpus files, processed in order; repeat a file to weight it
    #[arg(required = true)]
    corpus: Vec<PathBuf>,

    /// Minimum number of tokens in the generated story
    #[arg(long, default_value_t = 100)]
    min_words: usize,

    /// Context order of the model (1 or 2)
    #[arg(long, default_value_t = 1)]
    order: usize,

    /// Random seed; defaults to a time-derived value
    #[arg(long)]
    seed: Option<u64>,

    /// Number of restarts allowed when generation dead-ends
    #[arg(long, default_value_t = 1)]
    attempts: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let args = Args::parse();
    match args.order {
        1 => run::<1>(&args),
        2 => run::<2>(&args),
        other => bail!("context order must be 1 or 2, got {other}"),
    }
}

fn run<const N: usize>(args: &Args) -> anyhow::Result<()> {
    let mut chain: MarkovChain<N> = match args.seed {
        Some(seed) => MarkovChain::with_seed(seed)?,
        None => MarkovChain::new()?,
    };

    for path in &args.corpus {
        log::info!("Processing {}...", path.display());
        for line in read_lines(path)? {
            let unrecognized = chain.process_string(&line);
            if !unrecognized.is_empty() {
                let mut characters: Vec<char> = unrecognized.into_iter().collect();
                characters.sort_unstable();
                log::warn!(
                    "Unrecognized characters: {}",
                    characters
                        .iter()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
    }

    log::info!(
        "Trained on {} contexts ({} observations)",
        chain.context_count(),
        chain.observation_count()
    );
    log::info!("Generating story of approximately {} words...", args.min_words);

    let story = chain.generate_story(args.min_words, args.attempts)?;
    println!("{story}");

    Ok(())
}
