pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pantry")]
#[command(about = "Pantry - Recipe recommendations from the ingredients you own", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Run database migrations
    Migrate,

    /// Import a YAML or JSON recipe catalog into the database
    Import {
        /// Catalog file
        path: PathBuf,
    },

    /// Ask a running server for recipes matching the pantry
    Recommend {
        /// Result page
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Ask a running server which ingredients a recipe still needs
    Missing {
        /// Recipe name
        recipe: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from(["pantry", "import", "recipes.yaml"]).unwrap();
        match cli.command {
            Commands::Import { path } => assert_eq!(path, PathBuf::from("recipes.yaml")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_recommend_page_defaults_to_one() {
        let cli = Cli::try_parse_from(["pantry", "recommend"]).unwrap();
        assert!(matches!(cli.command, Commands::Recommend { page: 1 }));
    }
}
