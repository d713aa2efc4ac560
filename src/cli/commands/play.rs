//! Play command - Pit the random policy against the built-in random opponent

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::output::{print_kv, print_outcome_counts, print_section},
    pipeline::RandomPolicy,
    ports::Policy,
    quarto::Environment,
};

#[derive(Parser, Debug)]
#[command(about = "Play random-vs-random games")]
pub struct PlayArgs {
    /// Number of games
    #[arg(long, short = 'g', default_value_t = 1)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log every half-turn and the board after it
    #[arg(long, default_value_t = false)]
    pub show: bool,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let (mut player, opponent) = match args.seed {
        Some(seed) => (
            RandomPolicy::with_seed("Random", seed),
            RandomPolicy::with_seed("Random", seed.wrapping_add(1)),
        ),
        None => (RandomPolicy::default(), RandomPolicy::default()),
    };

    print_section(&format!("{} vs {}", player.name(), opponent.name()));

    let mut env = Environment::new(Box::new(opponent));
    env.set_trace(args.show);

    while env.result_log().len() < args.games {
        let action = player.choose_action(&env.view())?;
        let step = env.step(action)?;
        if args.show {
            if let Some(termination) = step.termination {
                println!("Game {} ended: {termination:?}", env.result_log().len());
            }
        }
    }

    print_outcome_counts(&env.result_log().counts());
    print_kv("Win rate", &format!("{:.3}", env.result_log().counts().win_rate()));
    Ok(())
}
