//! 結果表示（サマリーカード + 表）とエラーパネル

use leptos::prelude::*;
use ledgerlift_common::{ResultTable, SummaryCard};

#[component]
pub fn SummaryCards(cards: Vec<SummaryCard>) -> impl IntoView {
    view! {
        <div class="summary-cards">
            {cards
                .into_iter()
                .map(|card| {
                    let class = format!("summary-card tone-{}", card.tone.as_str());
                    view! {
                        <div class=class>
                            <span class="summary-label">{card.label}</span>
                            <span class="summary-value">{card.value}</span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn ResultTableView(table: ResultTable) -> impl IntoView {
    let ResultTable { title, headers, rows } = table;
    let count = rows.len();
    let columns = headers.len().max(1);

    let body = if rows.is_empty() {
        view! {
            <tr>
                <td class="text-muted empty-row" colspan=columns.to_string()>"No items"</td>
            </tr>
        }
        .into_any()
    } else {
        rows.into_iter()
            .map(|row| {
                view! {
                    <tr>{row.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}</tr>
                }
            })
            .collect_view()
            .into_any()
    };

    view! {
        <section class="result-table">
            <h3>{title} <span class="badge">{count}</span></h3>
            <div class="table-scroll">
                <table>
                    <thead>
                        <tr>{headers.into_iter().map(|h| view! { <th>{h}</th> }).collect_view()}</tr>
                    </thead>
                    <tbody>{body}</tbody>
                </table>
            </div>
        </section>
    }
}

#[component]
pub fn ResultView(cards: Vec<SummaryCard>, tables: Vec<ResultTable>) -> impl IntoView {
    view! {
        <div class="result-view">
            <SummaryCards cards=cards />
            {tables
                .into_iter()
                .map(|table| view! { <ResultTableView table=table /> })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn ErrorPanel(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="error-panel" role="alert">
            <strong>"Something went wrong"</strong>
            <p>{message}</p>
        </div>
    }
}
