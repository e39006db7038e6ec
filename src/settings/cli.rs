use super::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "lectern", version, about = "Console client for the lesson backend")]
pub struct Cli {
    #[arg(long, global = true)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Sign in and keep the tokens for later commands.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the signed-in user.
    Whoami,
    Lessons {
        #[command(subcommand)]
        action: LessonsCommand,
    },
    Topics {
        lesson: String,
    },
    Quizzes {
        topic: String,
    },
    Vocab {
        topic: String,
    },
    Videos,
    /// List accounts. Admin only.
    Users,
    Report {
        #[command(subcommand)]
        action: ReportCommand,
    },
    Translate {
        text: String,
        #[arg(long, default_value = "en")]
        from: String,
        #[arg(long, default_value = "vi")]
        to: String,
    },
    Languages,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum LessonsCommand {
    List,
    Show {
        id: String,
    },
    Publish {
        id: String,
        /// Take the lesson offline instead.
        #[arg(long)]
        unpublish: bool,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ReportCommand {
    /// Progress of every learner, or of one with `--user`.
    Progress {
        #[arg(long)]
        user: Option<String>,
    },
    Students,
    TeacherProgress,
    Dashboard,
    Recent {
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}
