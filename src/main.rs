//! `ttt` - play optimal tic-tac-toe and run opening experiments.
//!
//! - `play`: a console game between you and the search engine
//! - `watch`: two automatic players against each other
//! - `best-move`: the optimal move for a given board
//! - `experiment`: Monte Carlo sweeps over first move and move order

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ttt_minimax::board::{Board, Marker};
use ttt_minimax::chart::{ChartSink, JsonChartSink, TableChartSink};
use ttt_minimax::config::ExperimentConfig;
use ttt_minimax::game::{ConsoleRenderer, Game};
use ttt_minimax::harness::Harness;
use ttt_minimax::player::{ConsoleInput, Opening, Player};
use ttt_minimax::random::{CustomNumberGenerator, RandomGenerator, StandardRandomGenerator};
use ttt_minimax::search::best_move;

#[derive(Parser)]
#[command(name = "ttt")]
#[command(version, about = "Optimal tic-tac-toe and opening experiments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer on the console
    Play {
        /// Your marker.
        #[arg(long, default_value = "X")]
        marker: Marker,

        /// Let the computer move first.
        #[arg(long)]
        second: bool,
    },

    /// Watch two computer players
    Watch {
        /// Opening of the first player: search, random or 0-8.
        #[arg(long, default_value = "search")]
        opening: Opening,

        /// Random seed for a reproducible random opening.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the optimal move for a board such as "XO- -X- ---"
    BestMove {
        /// Nine cells of X, O or '-'.
        board: String,

        /// Marker to move; inferred from the piece counts when omitted.
        #[arg(long)]
        marker: Option<Marker>,
    },

    /// Run the Monte Carlo sweeps and print or export their charts
    Experiment(ExperimentArgs),
}

/// Command-line overrides for [`ExperimentConfig`].
#[derive(Args, Debug)]
struct ExperimentArgs {
    /// TOML file with experiment settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated trial counts, e.g. 50,100,1000.
    #[arg(short, long, value_delimiter = ',')]
    trials: Option<Vec<usize>>,

    /// Number of intervals in the probability sweep.
    #[arg(long)]
    steps: Option<usize>,

    /// Probability of the subject moving first in the first-move sweep.
    #[arg(long)]
    first_move_probability: Option<f64>,

    /// Subject opening in the probability sweep: random or 0-8.
    #[arg(long)]
    opening: Option<Opening>,

    /// Random seed for reproducibility.
    #[arg(long)]
    seed: Option<u64>,

    /// Run trials on a single thread.
    #[arg(long)]
    sequential: bool,

    /// Directory for JSON chart files.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ExperimentArgs {
    /// Loads the config file, if any, and applies the flags on top of it.
    fn into_config(self) -> Result<ExperimentConfig> {
        let mut settings = match &self.config {
            Some(path) => ExperimentConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => ExperimentConfig::default(),
        };
        if let Some(trials) = self.trials {
            settings = settings.with_trial_counts(trials);
        }
        if let Some(steps) = self.steps {
            settings = settings.with_probability_steps(steps);
        }
        if let Some(probability) = self.first_move_probability {
            settings = settings.with_first_move_probability(probability);
        }
        if let Some(opening) = self.opening {
            settings = settings.with_opening(opening);
        }
        if let Some(seed) = self.seed {
            settings = settings.with_seed(seed);
        }
        if self.sequential {
            settings = settings.with_parallel(false);
        }
        if let Some(output) = self.output {
            settings = settings.with_output_dir(output);
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { marker, second } => play(marker, second),
        Commands::Watch { opening, seed } => match seed {
            Some(seed) => watch(opening, CustomNumberGenerator::for_trial(seed, 0)),
            None => watch(opening, StandardRandomGenerator),
        },
        Commands::BestMove { board, marker } => analyze(&board, marker),
        Commands::Experiment(args) => experiment(&args.into_config()?),
    }
}

fn play(marker: Marker, second: bool) -> Result<()> {
    let human: Player = Player::human(marker, ConsoleInput);
    let computer: Player = Player::automatic(marker.opponent());
    let (mut player1, mut player2) = if second {
        (computer, human)
    } else {
        (human, computer)
    };

    let record = Game::new().play(&mut player1, &mut player2, &mut ConsoleRenderer)?;
    info!(state = ?record.state, moves = ?record.moves, "console game finished");
    Ok(())
}

fn watch<R: RandomGenerator>(opening: Opening, random: R) -> Result<()> {
    let mut player1: Player<R> = Player::automatic_with_opening(Marker::X, opening, random);
    let mut player2: Player<R> = Player::automatic(Marker::O);

    let record = Game::new().play(&mut player1, &mut player2, &mut ConsoleRenderer)?;
    println!("Moves: {:?}", record.moves);
    Ok(())
}

fn analyze(text: &str, marker: Option<Marker>) -> Result<()> {
    let mut board = text.parse::<Board>().context("invalid board")?;
    let marker = marker.unwrap_or_else(|| board.next_marker());

    print!("{board}");
    if board.is_game_over() {
        println!("Game is already over: {:?}", board.winner());
        return Ok(());
    }

    let result = best_move(&mut board, marker).context("no move available")?;
    let verdict = match result.score {
        1 => "forced win",
        -1 => "forced loss",
        _ => "draw",
    };
    println!(
        "Best move for {marker}: {} ({verdict}, {} positions searched)",
        result.position, result.nodes
    );
    Ok(())
}

fn experiment(config: &ExperimentConfig) -> Result<()> {
    let mut harness = Harness::new().with_parallel(config.parallel);
    if let Some(seed) = config.seed {
        harness = harness.with_seed(seed);
    }

    let mut sinks: Vec<Box<dyn ChartSink>> = vec![Box::new(TableChartSink::new(io::stdout()))];
    if let Some(dir) = &config.output_dir {
        sinks.push(Box::new(JsonChartSink::new(dir)));
    }

    let points_per_count = 9 + config.probability_steps + 1;
    let progress = ProgressBar::new((config.trial_counts.len() * points_per_count) as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rounds ({msg})")
            .context("invalid progress bar template")?
            .progress_chars("=>-"),
    );

    let mut charts = Vec::new();
    for &trials in &config.trial_counts {
        progress.set_message(format!("{trials} trials"));
        charts.push(harness.sweep_first_move_with(
            config.first_move_probability,
            trials,
            |_, _| progress.inc(1),
        )?);
        charts.push(harness.sweep_player1_probability_with(
            config.probability_steps,
            trials,
            config.opening,
            |_, _| progress.inc(1),
        )?);
    }
    progress.finish_and_clear();

    for chart in &charts {
        for sink in sinks.iter_mut() {
            sink.draw(chart)?;
        }
    }
    Ok(())
}
