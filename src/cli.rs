use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kubekit")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Ordered batch apply and bounded waits on top of kubectl/oc", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Cluster tool to drive
    #[arg(long, value_enum, global = true, env = "KUBEKIT_TOOL")]
    pub tool: Option<ToolArg>,

    /// Namespace to run in (defaults to the tool's default namespace)
    #[arg(short, long, global = true, env = "KUBEKIT_NAMESPACE")]
    pub namespace: Option<String>,

    /// Config file (defaults to ~/.config/kubekit/config.toml)
    #[arg(long, global = true, env = "KUBEKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run batch operations with elevated privileges (oc only)
    #[arg(long, global = true, env = "KUBEKIT_ADMIN")]
    pub admin: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ToolArg {
    Kubectl,
    Oc,
}

impl From<ToolArg> for kubeclient::Tool {
    fn from(arg: ToolArg) -> Self {
        match arg {
            ToolArg::Kubectl => Self::Kubectl,
            ToolArg::Oc => Self::Oc,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that kubectl and oc can be found
    Check,

    /// Create every descriptor under the given paths
    Create(ApplyArgs),

    /// Delete every descriptor under the given paths (reverse order)
    Delete(ApplyArgs),

    /// Replace every descriptor under the given paths
    Replace(ApplyArgs),

    /// Create or delete namespaces (elevated privileges)
    #[command(subcommand)]
    Namespace(NamespaceCommand),

    /// Print a resource
    Get {
        /// Resource type (pod, deployment, ...)
        resource_type: String,
        /// Resource name
        name: String,
        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// List resource names
    List {
        /// Resource type
        resource_type: String,
    },

    /// Describe a resource
    Describe {
        /// Resource type
        resource_type: String,
        /// Resource name
        name: String,
    },

    /// Print pod logs
    Logs {
        /// Pod name
        pod: String,
    },

    /// Run a command inside a pod
    Exec {
        /// Pod name
        pod: String,
        /// Command and arguments
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Wait for a resource to reach a state
    #[command(subcommand)]
    Wait(WaitCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Batch
// ============================================================================

#[derive(Parser)]
pub struct ApplyArgs {
    /// Descriptor files or directories; `-` reads one document from stdin
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

// ============================================================================
// Namespace
// ============================================================================

#[derive(Subcommand)]
pub enum NamespaceCommand {
    /// Create a namespace
    Create {
        /// Namespace name
        name: String,
    },

    /// Delete a namespace
    Delete {
        /// Namespace name
        name: String,

        /// Also wait until it is gone
        #[arg(short, long)]
        wait: bool,
    },
}

// ============================================================================
// Wait
// ============================================================================

#[derive(Subcommand)]
pub enum WaitCommand {
    /// Until all replicas of a deployment are ready
    Deployment {
        /// Deployment name
        name: String,
    },

    /// Until every container of a pod is ready
    Pod {
        /// Pod name
        name: String,
    },

    /// Until a stateful set has rolled out
    #[command(name = "statefulset")]
    StatefulSet {
        /// Stateful set name
        name: String,

        /// Exact replica count; each pod is then waited on too
        #[arg(short, long)]
        pods: Option<u32>,
    },

    /// Until a resource exists
    Created {
        /// Resource type
        resource_type: String,
        /// Resource name
        name: String,
    },

    /// Until a resource is gone
    Deleted {
        /// Resource type
        resource_type: String,
        /// Resource name
        name: String,
    },

    /// Until a resource is recreated
    Updated {
        /// Resource type
        resource_type: String,
        /// Resource name
        name: String,

        /// Creation time to beat (e.g. 2024-01-15T08:00:00Z); defaults to the
        /// resource's current creation time
        #[arg(long)]
        since: Option<String>,
    },
}
