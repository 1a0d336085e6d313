use super::ConnectionArgs;
use clap::Args;
use sheetsql::RowShape;
use tracing::info;

#[derive(Args)]
pub struct QueryCommand {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Spreadsheet key
    key: String,

    /// Worksheet title
    worksheet: String,

    /// Query using column labels, e.g. "SELECT name, age WHERE age > 30"
    tq: String,

    /// Row shape: mapping, sequence, tuple
    #[arg(long, default_value = "mapping")]
    shape: String,
}

impl QueryCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let shape: RowShape = self.shape.parse()?;

        let rt = tokio::runtime::Runtime::new()?;
        let rows = rt.block_on(async {
            let worksheet = self.connection.worksheet(&self.key, &self.worksheet).await?;
            Ok::<_, anyhow::Error>(worksheet.query(&self.tq, Some(shape)).await?)
        })?;

        let mut printed = 0usize;
        for row in rows {
            println!("{}", serde_json::to_string(&row)?);
            printed += 1;
        }
        info!("{} rows", printed);
        Ok(())
    }
}

#[derive(Args)]
pub struct CountCommand {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Spreadsheet key
    key: String,

    /// Worksheet title
    worksheet: String,
}

impl CountCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        let count = rt.block_on(async {
            let worksheet = self.connection.worksheet(&self.key, &self.worksheet).await?;
            Ok::<_, anyhow::Error>(worksheet.count().await?)
        })?;

        println!("{}", count);
        Ok(())
    }
}
