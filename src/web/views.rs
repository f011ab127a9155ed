//! Server-side HTML for the entry pages.
//!
//! Every piece of user or database text goes through `escape::html` before it
//! is placed in the markup.

use super::escape::{html, percent_encode};
use super::flash::Flash;
use super::forms::{EntryForm, FormErrors};
use crate::models::entry::Entry;
use crate::models::page::{Page, PageQuery};
use crate::models::reference::OptionSet;
use crate::models::sort::{SortColumn, SortOrder};
use crate::options::FormOptions;

const TITLE: &str = "Entries database";

/// `/list?...` with every parameter spelled out.
pub fn list_url(page: u32, sort: SortColumn, order: SortOrder, filter: &str) -> String {
    format!(
        "/list?page={}&sortBy={}&order={}&filter={}",
        page,
        sort.as_param(),
        order.as_param(),
        percent_encode(filter)
    )
}

/// The list view with default paging, sorting and filtering.
pub fn home_url() -> String {
    list_url(0, SortColumn::Name, SortOrder::Asc, "")
}

fn layout(heading: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{TITLE}</title>\n\
         </head>\n\
         <body>\n\
         <header><h1><a href=\"/\">{TITLE}</a></h1></header>\n\
         <section id=\"main\">\n\
         <h2>{}</h2>\n\
         {}\n\
         </section>\n\
         </body>\n\
         </html>\n",
        html(heading),
        body
    )
}

fn flash_block(flash: Option<&Flash>) -> String {
    match flash {
        Some(f) => format!(
            "<div class=\"alert-message {}\"><strong>{}</strong></div>\n",
            f.level.as_str(),
            html(&f.message)
        ),
        None => String::new(),
    }
}

fn sort_header(query: &PageQuery, column: SortColumn, label: &str) -> String {
    let (order, class) = if query.sort == column {
        match query.order {
            SortOrder::Asc => (SortOrder::Desc, " class=\"header headerSortDown\""),
            SortOrder::Desc => (SortOrder::Asc, " class=\"header headerSortUp\""),
        }
    } else {
        (SortOrder::Asc, " class=\"header\"")
    };

    format!(
        "<th{class}><a href=\"{}\">{}</a></th>",
        html(&list_url(0, column, order, &query.filter)),
        html(label)
    )
}

fn entry_row(entry: &Entry) -> String {
    let cell = |s: &str| {
        if s.is_empty() {
            "<td><em>-</em></td>".to_string()
        } else {
            format!("<td>{}</td>", html(s))
        }
    };

    format!(
        "<tr><td><a href=\"/edit/{}\">{}</a></td>{}{}{}</tr>\n",
        entry.id,
        html(&entry.name),
        cell(&entry.start_date_str()),
        cell(&entry.end_date_str()),
        cell(entry.vendor_name()),
    )
}

fn pagination(page: &Page<Entry>, query: &PageQuery) -> String {
    let mut out = String::from("<div id=\"pagination\" class=\"pagination\"><ul>\n");

    if page.has_prev() {
        out.push_str(&format!(
            "<li class=\"prev\"><a href=\"{}\">&larr; Previous</a></li>\n",
            html(&list_url(page.page_index - 1, query.sort, query.order, &query.filter))
        ));
    } else {
        out.push_str("<li class=\"prev disabled\"><a>&larr; Previous</a></li>\n");
    }

    out.push_str(&format!(
        "<li class=\"current\"><a>Displaying {} to {} of {}</a></li>\n",
        page.display_from(),
        page.display_to(),
        page.total_count
    ));

    if page.has_next() {
        out.push_str(&format!(
            "<li class=\"next\"><a href=\"{}\">Next &rarr;</a></li>\n",
            html(&list_url(page.page_index + 1, query.sort, query.order, &query.filter))
        ));
    } else {
        out.push_str("<li class=\"next disabled\"><a>Next &rarr;</a></li>\n");
    }

    out.push_str("</ul></div>\n");
    out
}

/// Paginated, sortable list of entries.
pub fn list_page(page: &Page<Entry>, query: &PageQuery, flash: Option<&Flash>) -> String {
    let mut body = flash_block(flash);

    body.push_str(&format!(
        "<div id=\"actions\">\n\
         <form action=\"/list\" method=\"GET\">\n\
         <input type=\"hidden\" name=\"sortBy\" value=\"{}\">\n\
         <input type=\"hidden\" name=\"order\" value=\"{}\">\n\
         <input type=\"search\" id=\"searchbox\" name=\"filter\" value=\"{}\" placeholder=\"Filter by entry name...\">\n\
         <input type=\"submit\" id=\"searchsubmit\" value=\"Filter by name\">\n\
         </form>\n\
         <a id=\"add\" href=\"/create\">Add a new entry</a>\n\
         </div>\n",
        query.sort.as_param(),
        query.order.as_param(),
        html(&query.filter)
    ));

    if page.items.is_empty() {
        body.push_str("<div class=\"well\"><em>Nothing to display</em></div>\n");
    } else {
        body.push_str("<table class=\"entries zebra-striped\">\n<thead><tr>");
        body.push_str(&sort_header(query, SortColumn::Name, "Entry name"));
        body.push_str(&sort_header(query, SortColumn::StartDate, "Start date"));
        body.push_str(&sort_header(query, SortColumn::EndDate, "End date"));
        body.push_str(&sort_header(query, SortColumn::Vendor, "Vendor"));
        body.push_str("</tr></thead>\n<tbody>\n");
        for entry in &page.items {
            body.push_str(&entry_row(entry));
        }
        body.push_str("</tbody>\n</table>\n");
    }

    body.push_str(&pagination(page, query));

    let heading = match page.total_count {
        0 => "No entries".to_string(),
        1 => "One entry found".to_string(),
        n => format!("{n} entries found"),
    };
    layout(&heading, &body)
}

fn select(name: &str, label: &str, options: &OptionSet, selected: &str, error: Option<&str>) -> String {
    let mut out = format!(
        "<div class=\"clearfix{}\">\n<label for=\"{name}\">{}</label>\n<select id=\"{name}\" name=\"{name}\">\n\
         <option value=\"\">-- Choose a {} --</option>\n",
        if error.is_some() { " error" } else { "" },
        html(label),
        html(&label.to_lowercase()),
    );
    for (id, display) in options.iter() {
        let sel = if id == selected { " selected" } else { "" };
        out.push_str(&format!(
            "<option value=\"{}\"{sel}>{}</option>\n",
            html(id),
            html(display)
        ));
    }
    out.push_str("</select>\n");
    if let Some(msg) = error {
        out.push_str(&format!("<span class=\"help-inline\">{}</span>\n", html(msg)));
    }
    out.push_str("</div>\n");
    out
}

fn text_input(name: &str, label: &str, value: &str, hint: &str, error: Option<&str>) -> String {
    let mut out = format!(
        "<div class=\"clearfix{}\">\n<label for=\"{name}\">{}</label>\n\
         <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\" placeholder=\"{}\">\n",
        if error.is_some() { " error" } else { "" },
        html(label),
        html(value),
        html(hint),
    );
    if let Some(msg) = error {
        out.push_str(&format!("<span class=\"help-inline\">{}</span>\n", html(msg)));
    }
    out.push_str("</div>\n");
    out
}

fn form_fields(form: &EntryForm, errors: &FormErrors, options: &FormOptions) -> String {
    let mut out = String::from("<fieldset>\n");
    out.push_str(&text_input("name", "Entry name", &form.name, "Required", errors.get("name")));
    out.push_str(&text_input(
        "start_date",
        "Start date",
        &form.start_date,
        "yyyy-MM-dd",
        errors.get("start_date"),
    ));
    out.push_str(&text_input(
        "end_date",
        "End date",
        &form.end_date,
        "yyyy-MM-dd",
        errors.get("end_date"),
    ));
    out.push_str(&select("vendor", "Vendor", &options.vendors, &form.vendor, errors.get("vendor")));
    out.push_str(&select(
        "department",
        "Department",
        &options.departments,
        &form.department,
        errors.get("department"),
    ));
    out.push_str("</fieldset>\n");
    out
}

/// Edit form of an existing entry, with its delete button.
pub fn edit_form(id: i64, form: &EntryForm, errors: &FormErrors, options: &FormOptions) -> String {
    let body = format!(
        "<form action=\"/update/{id}\" method=\"POST\">\n\
         {}\
         <div class=\"actions\">\n\
         <input type=\"submit\" value=\"Save this entry\" class=\"btn primary\"> or\n\
         <a href=\"{}\" class=\"btn\">Cancel</a>\n\
         </div>\n\
         </form>\n\
         <form action=\"/delete/{id}\" method=\"POST\" class=\"topRight\">\n\
         <input type=\"submit\" value=\"Delete this entry\" class=\"btn danger\">\n\
         </form>\n",
        form_fields(form, errors, options),
        html(&home_url()),
    );
    layout("Edit entry", &body)
}

/// Empty (or re-rendered) form for a new entry.
pub fn create_form(form: &EntryForm, errors: &FormErrors, options: &FormOptions) -> String {
    let body = format!(
        "<form action=\"/save\" method=\"POST\">\n\
         {}\
         <div class=\"actions\">\n\
         <input type=\"submit\" value=\"Create this entry\" class=\"btn primary\"> or\n\
         <a href=\"{}\" class=\"btn\">Cancel</a>\n\
         </div>\n\
         </form>\n",
        form_fields(form, errors, options),
        html(&home_url()),
    );
    layout("Add an entry", &body)
}

pub fn not_found(id: i64) -> String {
    layout(
        "Entry not found",
        &format!(
            "<p>No entry with id {id} exists.</p>\n<p><a href=\"{}\">Back to the list</a></p>",
            html(&home_url())
        ),
    )
}

pub fn error_page(message: &str) -> String {
    layout(
        "Something went wrong",
        &format!(
            "<p>{}</p>\n<p><a href=\"{}\">Back to the list</a></p>",
            html(message),
            html(&home_url())
        ),
    )
}
