mod run;

use crate::options::Options;

/// Action enum representing each possible command
#[derive(Debug)]
pub enum Action {
    Grab {
        host: String,
        port: String,
        options: Options,
    },
}

impl Action {
    /// Execute the action
    ///
    /// # Errors
    ///
    /// Returns an error if the action fails to execute
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
