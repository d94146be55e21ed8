use log::{error, info};
use rs_chain_core::config::Config;
use rs_chain_core::model::generator::Generator;
use rs_chain_core::publish::{StdoutPublisher, post_message};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Configuration file, "rs-chain.toml" unless RS_CHAIN_CONFIG says otherwise.
    // A missing file means default settings (corpora in "./data/*.txt")
    let config_path = std::env::var("RS_CHAIN_CONFIG").unwrap_or_else(|_| "rs-chain.toml".to_owned());
    let config = Config::load(&config_path)?;

    // Load every corpus of the folder, building the .bin caches on first run
    let generator = Generator::new(&config)?;
    info!(
        "Loaded {:?}: {} contexts, {} starters",
        generator.model().corpus_names(),
        generator.model().transition_count(),
        generator.model().starter_count()
    );

    if config.dump_model {
        for (context, candidates) in generator.model().sorted_transitions() {
            println!("({}) -> {:?}", context, candidates);
        }
    }

    // Each message goes to stdout; swap the publisher to post elsewhere
    let mut publisher = StdoutPublisher;
    let mut rng = rand::rng();
    for i in 0..config.count {
        match post_message(&generator, &mut rng, &mut publisher) {
            Ok(message) => info!("Message {}: {} chars", i + 1, message.char_len()),
            Err(e) => {
                error!("Could not post message {}: {}", i + 1, e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}
