use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use voyage_core::Collection;
use voyage_core::listing::StatusTab;

#[derive(Parser)]
#[command(name = "voyage")]
#[command(about = "Travel package content backend", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage travel and discovery packages
    #[command(subcommand)]
    Package(PackageCommands),

    /// Upload or delete files in the media bucket
    #[command(subcommand)]
    Media(MediaCommands),

    /// Manage travel moment videos
    #[command(subcommand)]
    Moment(MomentCommands),

    /// Admin sign-in on this device
    #[command(subcommand)]
    Admin(AdminCommands),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum PackageCommands {
    /// List packages
    List {
        #[arg(long, short, default_value = "travel")]
        collection: Collection,

        /// Filter on title or slug
        #[arg(long)]
        search: Option<String>,

        /// all, published or draft
        #[arg(long, default_value = "all")]
        status: StatusTab,

        /// Cap the number of packages shown
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Published packages as the home page lists them
    Featured {
        #[arg(long, short, default_value = "travel")]
        collection: Collection,

        #[arg(long, default_value = "6")]
        limit: usize,
    },

    /// Show a package by id, or a published travel package by slug
    Show {
        ident: String,

        #[arg(long)]
        json: bool,
    },

    /// Create a package
    Create {
        #[arg(long, short, default_value = "travel")]
        collection: Collection,

        title: String,

        #[arg(long)]
        price: String,

        #[command(flatten)]
        fields: PackageFields,

        /// Publish right away
        #[arg(long)]
        publish: bool,
    },

    /// Update fields of a package
    Update {
        #[arg(long, short, default_value = "travel")]
        collection: Collection,

        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[command(flatten)]
        fields: PackageFields,
    },

    /// Make a package visible on public pages
    Publish {
        #[arg(long, short, default_value = "travel")]
        collection: Collection,

        id: String,
    },

    /// Move a package back to draft
    Unpublish {
        #[arg(long, short, default_value = "travel")]
        collection: Collection,

        id: String,
    },

    /// Delete a package
    Delete {
        #[arg(long, short, default_value = "travel")]
        collection: Collection,

        id: String,

        /// Skip confirmation
        #[arg(long, short)]
        force: bool,
    },

    /// Upload images and append them to a package
    AddImage {
        #[arg(long, short, default_value = "travel")]
        collection: Collection,

        id: String,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Attach a video by upload or by link
    AddVideo {
        #[arg(long, short, default_value = "travel")]
        collection: Collection,

        id: String,

        /// Video file to upload
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        file: Option<PathBuf>,

        /// YouTube, Vimeo or direct link
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a video by position
    RemoveVideo {
        #[arg(long, short, default_value = "travel")]
        collection: Collection,

        id: String,

        index: usize,
    },

    /// Reorder a video
    MoveVideo {
        #[arg(long, short, default_value = "travel")]
        collection: Collection,

        id: String,

        from: usize,

        to: usize,
    },

    /// Set or clear the title and description of a video
    EditVideo {
        #[arg(long, short, default_value = "travel")]
        collection: Collection,

        id: String,

        index: usize,

        /// Empty string clears
        #[arg(long, required_unless_present = "description")]
        title: Option<String>,

        /// Empty string clears
        #[arg(long)]
        description: Option<String>,
    },

    /// Preview the slug a title turns into
    Slug { title: String },
}

/// Optional package fields shared by create and update
#[derive(Args, Default)]
pub struct PackageFields {
    #[arg(long)]
    pub duration: Option<String>,

    #[arg(long)]
    pub travel_period: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub rating: Option<f64>,

    #[arg(long)]
    pub review_count: Option<i64>,

    /// Repeatable
    #[arg(long = "highlight")]
    pub highlights: Vec<String>,

    /// Repeatable
    #[arg(long = "inclusion")]
    pub inclusions: Vec<String>,

    /// Repeatable
    #[arg(long = "exclusion")]
    pub exclusions: Vec<String>,
}

#[derive(Subcommand)]
pub enum MediaCommands {
    /// Upload files and print their public URLs
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Folder inside the bucket
        #[arg(long)]
        prefix: Option<String>,

        /// Copy the URLs to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Delete a file by its public URL
    Delete { url: String },
}

#[derive(Subcommand)]
pub enum MomentCommands {
    /// List travel moment videos
    List,

    /// Upload videos as travel moments
    Add {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Rename a travel moment
    Rename { id: String, name: String },

    /// Remove a travel moment
    Delete {
        id: String,

        /// Also delete the uploaded file
        #[arg(long)]
        purge: bool,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Sign in; the password is prompted for
    Login { email: String },

    /// Forget the signed-in admin
    Logout,

    /// Show who is signed in
    Status,
}
