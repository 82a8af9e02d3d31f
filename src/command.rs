use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Show this list")]
    Help,

    #[command(description = "Start")]
    Start,

    #[command(description = "Find a partner")]
    Find,

    #[command(description = "Show your gender, free matches and rating")]
    Profile,

    #[command(description = "User statistics (owners only)")]
    Stats,
}
