use clap::{Parser, Subcommand};
use log::error;
use std::process;

use kondate::{
    build_prompt, server, AppConfig, CookingTime, Cuisine, MealPlanner, MealTime, SuggestOutcome,
};

#[derive(Parser)]
#[command(name = "kondate")]
#[command(about = "Meal-plan suggestions from a generative text service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for meal suggestions
    Suggest {
        /// breakfast, lunch or dinner
        #[arg(long, default_value = "dinner")]
        meal_time: MealTime,
        /// japanese, western or chinese
        #[arg(long, default_value = "japanese")]
        cuisine: Cuisine,
        /// Number of dishes, 1 to 5
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u8,
        /// none, 15, 30 or 60 (minutes)
        #[arg(long, default_value = "none")]
        cooking_time: CookingTime,
        /// Send the prompt through a relay instead of calling the service directly
        #[arg(long)]
        relay: Option<String>,
        /// Print the generated prompt and exit without calling any service
        #[arg(long)]
        print_prompt: bool,
        /// Print suggestions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP relay
    Serve {
        /// Address to listen on (overrides configuration)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Suggest {
            meal_time,
            cuisine,
            count,
            cooking_time,
            relay,
            print_prompt,
            json,
        } => {
            let mut builder = MealPlanner::builder()
                .meal_time(meal_time)
                .cuisine(cuisine)
                .count(count)
                .cooking_time(cooking_time);
            if let Some(url) = relay {
                builder = builder.relay_url(url);
            }

            if print_prompt {
                match builder.parameters() {
                    Ok(params) => println!("{}", build_prompt(&params)),
                    Err(e) => exit_with(&e.user_message()),
                }
                return;
            }

            match builder.build().await {
                Ok(SuggestOutcome::Suggestions(suggestions)) if json => {
                    match serde_json::to_string_pretty(&suggestions) {
                        Ok(out) => println!("{}", out),
                        Err(e) => exit_with(&e.to_string()),
                    }
                }
                Ok(SuggestOutcome::Suggestions(suggestions)) => {
                    for (i, suggestion) in suggestions.iter().enumerate() {
                        println!("{}. {}", i + 1, suggestion.name);
                        println!("   {}", suggestion.description);
                    }
                }
                Ok(SuggestOutcome::NoMatch) => println!("{}", SuggestOutcome::NO_MATCH_MESSAGE),
                Err(e) => {
                    error!("Suggestion request failed: {}", e);
                    exit_with(&e.user_message());
                }
            }
        }
        Commands::Serve { bind } => {
            let mut config = match AppConfig::load() {
                Ok(config) => config,
                Err(e) => exit_with(&format!("Failed to load configuration: {}", e)),
            };
            if let Some(bind) = bind {
                config.server.bind = bind;
            }

            if let Err(e) = server::serve(&config).await {
                error!("Relay stopped: {}", e);
                exit_with(&e.to_string());
            }
        }
    }
}

fn exit_with(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
