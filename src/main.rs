use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Result;
use log::error;

use digit_mlp::config::DriverConfig;
use digit_mlp::helpers::{accuracy, load_or_train};
use digit_mlp::mlp::MLP;
use digit_mlp::mnist_data::Dataset;
use digit_mlp::model_store::FileModelStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Yes,
    No,
}

fn parse_choice(input: &str) -> Option<Choice> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(Choice::Yes),
        "" | "n" | "no" => Some(Choice::No),
        _ => None,
    }
}

// Re-asks until the answer is understood; end of input counts as "no".
fn prompt_choice<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Choice> {
    loop {
        write!(output, "Evaluate the model on the test set? [y/N] ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Choice::No);
        }
        match parse_choice(&line) {
            Some(choice) => return Ok(choice),
            None => writeln!(output, "Please answer 'y' or 'n'.")?,
        }
    }
}

fn run(config: &DriverConfig) -> Result<()> {
    let dataset = Dataset::load_dir(&config.data_dir)?;
    let store = FileModelStore::new(&config.model_path);
    let parameters = load_or_train(&store, &config.train, &dataset.train_images, &dataset.train_labels)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    if prompt_choice(&mut stdin.lock(), &mut stdout.lock())? == Choice::Yes {
        let mlp = MLP::new(parameters, config.train.execution_mode);
        let predictions = mlp.predict(&dataset.test_images)?;
        let accuracy = accuracy(&predictions, &dataset.test_labels)?;
        println!("Test Accuracy: {:.4}", accuracy);
    }
    Ok(())
}

fn main() -> ExitCode {
    if std::env::var_os("RUST_LOG").is_none() {
        pretty_env_logger::formatted_builder().filter_level(log::LevelFilter::Info).init();
    } else {
        pretty_env_logger::init();
    }

    match run(&DriverConfig::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
