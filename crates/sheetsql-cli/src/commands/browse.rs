use super::ConnectionArgs;
use clap::Args;
use colored::Colorize;

#[derive(Args)]
pub struct SpreadsheetsCommand {
    #[command(flatten)]
    connection: ConnectionArgs,
}

impl SpreadsheetsCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        let files = rt.block_on(async {
            let client = self.connection.client().await?;
            Ok::<_, anyhow::Error>(client.list_spreadsheet_files().await?)
        })?;

        for file in files {
            println!("{}  {}", file.id.bold(), file.name);
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct WorksheetsCommand {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Spreadsheet key
    key: String,
}

impl WorksheetsCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        let titles = rt.block_on(async {
            let conn = self.connection.connect().await?;
            let spreadsheet = conn.get_spreadsheet(&self.key).await?;
            Ok::<_, anyhow::Error>(spreadsheet.worksheets().await)
        })?;

        for title in titles {
            println!("{}", title);
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct ColumnsCommand {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Spreadsheet key
    key: String,

    /// Worksheet title
    worksheet: String,
}

impl ColumnsCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        let columns = rt.block_on(async {
            let worksheet = self.connection.worksheet(&self.key, &self.worksheet).await?;
            Ok::<_, anyhow::Error>(worksheet.column_label_id_map().await?)
        })?;

        for (label, id) in columns.iter() {
            println!("{:>4}  {}", id.bold(), label);
        }
        Ok(())
    }
}
