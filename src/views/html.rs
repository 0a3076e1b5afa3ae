//! HTML rendering of `Screen` values.
//!
//! Plain server-side markup: forms post back to the server, charts are
//! drawn with CSS bars and an inline SVG polyline.

use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;

use crate::{
    models::expense::{COLUMNS, Category, ExpenseRecord, PaymentMethod, Unit},
    services::{
        expense_form::ExpenseForm,
        report_service::Summary,
        session_service::Notice,
    },
    views::screen::{Dashboard, Screen},
};

const STYLE: &str = "\
body{font-family:sans-serif;margin:0;display:flex}\
nav{width:14rem;min-height:100vh;background:#f0f2f6;padding:1rem}\
nav a,nav button{display:block;margin:.5rem 0}\
main{flex:1;padding:1.5rem 2rem}\
.notice{padding:.75rem;border-radius:4px;margin:1rem 0}\
.error{background:#fde2e2}.success{background:#dcf5e3}.info{background:#e2ecfd}\
table{border-collapse:collapse}td,th{border:1px solid #ddd;padding:.25rem .5rem}\
.bar{background:#1f77b4;height:1rem}\
label{display:block;margin:.5rem 0}";

/// Format a money amount as shown on screen.
pub fn money(value: f64) -> String {
    format!("R$ {value:.2}")
}

/// Render a full page.
pub fn page(screen: &Screen) -> String {
    match screen {
        Screen::Login { notice } => layout(None, &login(notice.as_ref())),
        Screen::EntryForm {
            username,
            form,
            notice,
        } => layout(Some(username.as_str()), &entry_form(form, notice.as_ref())),
        Screen::Dashboard {
            username,
            dashboard,
        } => layout(Some(username.as_str()), &dashboard_body(dashboard)),
    }
}

fn layout(username: Option<&str>, body: &str) -> String {
    let nav = match username {
        Some(username) => format!(
            "<nav><h3>📂 Menu</h3><p>{}</p>\
             <a href=\"/expenses/new\">Registrar Gasto</a>\
             <a href=\"/dashboard\">Dashboard</a>\
             <form method=\"post\" action=\"/logout\"><button type=\"submit\">Sair</button></form></nav>",
            text(username)
        ),
        None => String::new(),
    };

    format!(
        "<!DOCTYPE html><html lang=\"pt-BR\"><head><meta charset=\"utf-8\">\
         <title>Controle de Gastos da Malharia</title><style>{STYLE}</style></head>\
         <body>{nav}<main>{body}</main></body></html>"
    )
}

fn notice_html(notice: Option<&Notice>) -> String {
    match notice {
        Some(notice) => format!(
            "<div class=\"notice {}\">{}</div>",
            if notice.is_error() { "error" } else { "success" },
            text(notice.message())
        ),
        None => String::new(),
    }
}

fn login(notice: Option<&Notice>) -> String {
    format!(
        "<h1>💼 Login - Controle de Gastos da Malharia</h1>\
         <form method=\"post\" action=\"/login\">\
         <label>Usuário <input name=\"username\" autocomplete=\"username\"></label>\
         <label>Senha <input name=\"password\" type=\"password\" autocomplete=\"current-password\"></label>\
         <button type=\"submit\">Entrar</button></form>{}",
        notice_html(notice)
    )
}

fn select<T: Copy + PartialEq>(name: &str, options: &[T], selected: T, label: fn(T) -> &'static str) -> String {
    let mut html = format!("<select name=\"{}\">", attr(name));
    for option in options.iter().copied() {
        let _ = write!(
            html,
            "<option value=\"{value}\"{sel}>{value}</option>",
            value = attr(label(option)),
            sel = if option == selected { " selected" } else { "" },
        );
    }
    html.push_str("</select>");
    html
}

fn entry_form(form: &ExpenseForm, notice: Option<&Notice>) -> String {
    format!(
        "<h2>📋 Registrar novo gasto</h2>\
         <form method=\"post\" action=\"/expenses\">\
         <label>Data <input type=\"date\" name=\"date\" value=\"{date}\"></label>\
         <label>Categoria {category}</label>\
         <label>Descrição <input name=\"description\" value=\"{description}\"></label>\
         <label>Quantidade <input type=\"number\" name=\"quantity\" min=\"1\" step=\"any\" value=\"{quantity}\"></label>\
         <label>Unidade {unit}</label>\
         <label>Valor Unitário (R$) <input type=\"number\" name=\"unit_value\" min=\"0\" step=\"0.01\" value=\"{unit_value}\"></label>\
         <p><strong>Valor Total:</strong> {total}</p>\
         <label>Forma de Pagamento {payment}</label>\
         <label>Observações <input name=\"notes\" value=\"{notes}\"></label>\
         <button type=\"submit\" name=\"intent\" value=\"preview\">Atualizar total</button> \
         <button type=\"submit\" name=\"intent\" value=\"save\">Salvar gasto</button>\
         </form>{notice}",
        date = form.date().format("%Y-%m-%d"),
        category = select("category", Category::ALL, form.category(), Category::label),
        description = attr(form.description()),
        quantity = form.quantity(),
        unit = select("unit", Unit::ALL, form.unit(), Unit::label),
        unit_value = form.unit_value(),
        total = money(form.total_value()),
        payment = select(
            "payment_method",
            PaymentMethod::ALL,
            form.payment_method(),
            PaymentMethod::label
        ),
        notes = attr(form.notes()),
        notice = notice_html(notice),
    )
}

fn dashboard_body(dashboard: &Dashboard) -> String {
    let mut html = String::from("<h1>📊 Dashboard de Gastos</h1>");

    let (records, summary) = match dashboard {
        Dashboard::Empty => {
            html.push_str("<div class=\"notice info\">Nenhum gasto registrado ainda.</div>");
            return html;
        }
        Dashboard::Ready { records, summary } => (records, summary),
    };

    html.push_str(&records_table(records));
    let _ = write!(
        html,
        "<p><strong>Total geral:</strong> {} em {} registro(s)</p>",
        money(summary.grand_total),
        summary.record_count
    );
    html.push_str(&category_chart(summary));
    html.push_str(&date_chart(&summary.by_date));
    html.push_str("<p><a href=\"/dashboard/export\" download>📥 Baixar Excel</a></p>");
    html
}

fn records_table(records: &[ExpenseRecord]) -> String {
    let mut html = String::from("<table><thead><tr>");
    for column in COLUMNS {
        let _ = write!(html, "<th>{}</th>", text(column));
    }
    html.push_str("</tr></thead><tbody>");

    for record in records {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            record.formatted_date(),
            text(record.category.label()),
            text(&record.description),
            record.quantity,
            text(record.unit.label()),
            money(record.unit_value),
            money(record.total_value),
            text(record.payment_method.label()),
            text(&record.notes),
        );
    }

    html.push_str("</tbody></table>");
    html
}

fn category_chart(summary: &Summary) -> String {
    let max = summary
        .by_category
        .iter()
        .map(|(_, value)| *value)
        .fold(0.0_f64, f64::max);

    let mut html = String::from("<h3>Gastos por categoria</h3><table>");
    for (category, value) in &summary.by_category {
        let width = if max > 0.0 { value / max * 100.0 } else { 0.0 };
        let _ = write!(
            html,
            "<tr><td>{}</td><td style=\"width:20rem\"><div class=\"bar\" style=\"width:{width:.1}%\"></div></td><td>{}</td></tr>",
            text(category.label()),
            money(*value),
        );
    }
    html.push_str("</table>");
    html
}

/// Line chart over the by-date series, x in chronological order.
fn date_chart(series: &[(NaiveDate, f64)]) -> String {
    const WIDTH: f64 = 600.0;
    const HEIGHT: f64 = 200.0;

    let max = series.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let step = if series.len() > 1 {
        WIDTH / (series.len() - 1) as f64
    } else {
        0.0
    };

    let points: Vec<String> = series
        .iter()
        .enumerate()
        .map(|(i, (_, value))| {
            let y = if max > 0.0 { HEIGHT - value / max * HEIGHT } else { HEIGHT };
            format!("{:.1},{:.1}", i as f64 * step, y)
        })
        .collect();

    let mut html = format!(
        "<h3>Gastos por dia</h3>\
         <svg viewBox=\"-10 -10 {w} {h}\" width=\"{w}\" height=\"{h}\">\
         <polyline fill=\"none\" stroke=\"#1f77b4\" stroke-width=\"2\" points=\"{}\"/></svg><ul>",
        points.join(" "),
        w = WIDTH + 20.0,
        h = HEIGHT + 20.0,
    );
    for (date, value) in series {
        let _ = write!(html, "<li>{}: {}</li>", date.format("%d/%m/%Y"), money(*value));
    }
    html.push_str("</ul>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::report_service::summarize;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn login_page_shows_failure_inline() {
        let html = page(&Screen::Login {
            notice: Some(Notice::LoginFailed),
        });
        assert!(html.contains("action=\"/login\""));
        assert!(html.contains("Usuário ou senha incorretos."));
        assert!(!html.contains("/logout"));
    }

    #[test]
    fn form_shows_total_and_escapes_text() {
        let mut form = ExpenseForm::new(today());
        form.set_quantity(10.0);
        form.set_unit_value(5.0);
        let html = page(&Screen::EntryForm {
            username: "<admin>".to_string(),
            form,
            notice: None,
        });
        assert!(html.contains("R$ 50.00"));
        assert!(html.contains("&lt;admin&gt;"));
        assert!(html.contains("<option value=\"Matéria-prima\" selected>"));
    }

    #[test]
    fn empty_dashboard_only_shows_notice() {
        let html = page(&Screen::Dashboard {
            username: "admin".to_string(),
            dashboard: Dashboard::Empty,
        });
        assert!(html.contains("Nenhum gasto registrado ainda."));
        assert!(!html.contains("/dashboard/export"));
    }

    #[test]
    fn dashboard_lists_records_and_export_link() {
        let record = ExpenseForm::new(today()).to_record();
        let records = vec![record];
        let summary = summarize(&records).unwrap();
        let html = page(&Screen::Dashboard {
            username: "admin".to_string(),
            dashboard: Dashboard::Ready { records, summary },
        });
        assert!(html.contains("01/06/2024"));
        assert!(html.contains("/dashboard/export"));
        assert!(html.contains("<polyline"));
    }

    #[test]
    fn table_shows_money_columns_as_currency() {
        let mut form = ExpenseForm::new(today());
        form.set_quantity(3.0);
        form.set_unit_value(2.5);
        let records = vec![form.to_record()];
        let summary = summarize(&records).unwrap();
        let html = page(&Screen::Dashboard {
            username: "admin".to_string(),
            dashboard: Dashboard::Ready { records, summary },
        });
        assert!(html.contains("<td>R$ 2.50</td><td>R$ 7.50</td>"));
    }
}
