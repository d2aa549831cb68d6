use clap::{Parser, Subcommand};
use ledgerlift_common::DemoKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ledgerlift")]
#[command(about = "LedgerLift: 会計業務自動化デモのCLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// デモを実行して結果を表示
    Demo {
        /// デモの種類 (invoice/10k/bank-rec/ap-rec/expenses/ar-rec)
        #[arg(value_parser = parse_demo_kind)]
        kind: DemoKind,

        /// アップロードするファイル。`欄=パス` または欄の順にパスを並べる
        #[arg(required = true)]
        files: Vec<String>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,

        /// サーバーのエクスポートを保存するパス
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// ローカルでExcelレポートを生成するパス
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// デモの一覧とアップロード欄を表示
    Demos,

    /// サインイン
    Login {
        /// メールアドレス（省略時は入力を求める）
        #[arg(short, long)]
        email: Option<String>,
    },

    /// サインアウト
    Logout,

    /// サインイン中のユーザーを表示
    Whoami,

    /// 設定
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// APIのベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 認証サービスのURLを設定
        #[arg(long)]
        set_auth_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

pub fn parse_demo_kind(value: &str) -> Result<DemoKind, String> {
    DemoKind::from_id(value).ok_or_else(|| {
        let ids: Vec<&str> = DemoKind::ALL.iter().map(|kind| kind.id()).collect();
        format!("不明なデモ `{}`（{}）", value, ids.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_demo_kind() {
        assert_eq!(parse_demo_kind("Bank-Rec"), Ok(DemoKind::BankRec));
        let err = parse_demo_kind("payroll").unwrap_err();
        assert!(err.contains("bank-rec"));
    }

    #[test]
    fn test_cli_parses_demo_command() {
        let cli = Cli::try_parse_from([
            "ledgerlift",
            "demo",
            "ap-rec",
            "vendor_statement=stmt.csv",
            "ledger.xlsx",
            "--report",
            "out.xlsx",
        ])
        .expect("parse failed");

        match cli.command {
            Commands::Demo { kind, files, json, export, report } => {
                assert_eq!(kind, DemoKind::ApRec);
                assert_eq!(files, vec!["vendor_statement=stmt.csv", "ledger.xlsx"]);
                assert!(!json);
                assert!(export.is_none());
                assert_eq!(report, Some(PathBuf::from("out.xlsx")));
            }
            _ => panic!("expected demo command"),
        }
    }
}
