//! Chat command - asks questions about a local dataset

use clap::Args;

use crate::config::AppConfig;
use crate::infrastructure::llm::{LlmFactory, LlmProviderConfig};

/// Arguments for the chat command
#[derive(Args, Clone)]
pub struct ChatArgs {
    /// Dataset path in the form organization/dataset
    pub path: String,

    /// First question starts the conversation, later ones follow up on it
    #[arg(required = true)]
    pub questions: Vec<String>,

    /// Model overriding the configured one
    #[arg(long, short)]
    pub model: Option<String>,

    /// Print the query behind each answer
    #[arg(long)]
    pub show_query: bool,
}

pub async fn run(config: &AppConfig, args: ChatArgs) -> anyhow::Result<()> {
    let mut llm_config = config.llm.clone();
    if let Some(model) = args.model {
        let LlmProviderConfig::OpenAi(openai) = &mut llm_config;
        openai.model = model;
    }

    let llm = LlmFactory::create(&llm_config)?;
    let mut dataset = super::load_dataset(config, &args.path).await?;

    for (i, question) in args.questions.iter().enumerate() {
        let response = if i == 0 {
            dataset.chat(question, llm.clone(), None).await?
        } else {
            dataset.follow_up(question).await?
        };

        if args.show_query {
            println!("-- {}", response.last_query);
        }
        println!("{}", response);
    }

    Ok(())
}
