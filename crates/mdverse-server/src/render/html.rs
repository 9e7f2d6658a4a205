// SPDX-License-Identifier: Apache-2.0

//! HTML pages and fragments. Every dynamic value goes through `escape_html`.

use mdverse_model::{
    format_gigabytes, format_thousands, DatasetAnalysedCounts, DatasetDetail, DatasetFileCounts,
    DatasetFileRow, FileKind, FileTypeStatsRow, OriginSummaryRow, OriginSummaryTotals,
    ParameterFileRow, TopologyFileRow, TrajectoryFileRow,
};
use std::fmt::Display;

#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Element id from free text: ASCII alphanumerics kept, everything else `-`.
fn dom_id(prefix: &str, raw: &str) -> String {
    let slug = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>();
    format!("{prefix}-{slug}")
}

fn text(value: impl Display) -> String {
    escape_html(&value.to_string())
}

fn opt<T: Display>(value: Option<&T>) -> String {
    value.map(text).unwrap_or_default()
}

fn opt_bool(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "true",
        Some(false) => "false",
        None => "",
    }
}

fn link(url: Option<&str>, label: &str) -> String {
    match url {
        Some(url) => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            escape_html(url),
            escape_html(label)
        ),
        None => escape_html(label),
    }
}

fn row(cells: &[String]) -> String {
    let mut out = String::from("<tr>");
    for cell in cells {
        out.push_str("<td>");
        out.push_str(cell);
        out.push_str("</td>");
    }
    out.push_str("</tr>");
    out
}

fn table(id: &str, headers: &[&str], rows: &[String]) -> String {
    let head = headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape_html(h)))
        .collect::<String>();
    format!(
        "<table id=\"{id}\" class=\"display compact\"><thead><tr>{head}</tr></thead><tbody>{}</tbody></table>",
        rows.concat()
    )
}

const NAV: &str = "<nav>\
<a href=\"/\">Home</a> \
<a href=\"/datasets\">Datasets</a> \
<a href=\"/file_types\">File types</a> \
<a href=\"/gro_files\">.gro files</a> \
<a href=\"/mdp_files\">.mdp files</a> \
<a href=\"/xtc_files\">.xtc files</a>\
</nav>";

#[must_use]
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>MDverse - {title}</title>\
<link rel=\"stylesheet\" href=\"/static/style.css\">\
<link rel=\"stylesheet\" href=\"https://cdn.datatables.net/2.0.8/css/dataTables.dataTables.min.css\">\
<script src=\"https://code.jquery.com/jquery-3.7.1.min.js\"></script>\
<script src=\"https://cdn.datatables.net/2.0.8/js/dataTables.min.js\"></script>\
<script src=\"https://unpkg.com/htmx.org@1.9.12\"></script>\
</head><body>{NAV}<main><h1>{title}</h1>{body}</main></body></html>",
        title = escape_html(title),
    )
}

#[must_use]
pub fn not_found_page(message: &str) -> String {
    page("Not found", &format!("<p class=\"error\">{}</p>", escape_html(message)))
}

#[must_use]
pub fn error_page(message: &str) -> String {
    page(
        "Server error",
        &format!("<p class=\"error\">{}</p>", escape_html(message)),
    )
}

pub struct IndexView<'a> {
    pub rows: &'a [OriginSummaryRow],
    pub totals: &'a OriginSummaryTotals,
    pub files_chart: &'a str,
    pub datasets_chart: &'a str,
    pub wordcloud_url: Option<&'a str>,
}

#[must_use]
pub fn index_page(view: &IndexView<'_>) -> String {
    let rows = view
        .rows
        .iter()
        .map(|r| {
            row(&[
                text(&r.dataset_origin),
                text(format_thousands(r.number_of_datasets)),
                opt(r.first_dataset.as_ref()),
                opt(r.last_dataset.as_ref()),
                text(format_thousands(r.non_zip_files)),
                text(format_thousands(r.zip_files)),
                text(format_thousands(r.files_within_zip_files)),
                text(format_thousands(r.total_files)),
                text(format_gigabytes(r.total_size_in_gb)),
            ])
        })
        .collect::<Vec<_>>();
    let summary = table(
        "origin-summary",
        &[
            "Data repository",
            "Number of datasets",
            "First dataset",
            "Last dataset",
            "Non-zip files",
            "Zip files",
            "Files in zip files",
            "Total files",
            "Total size (GB)",
        ],
        &rows,
    );
    let totals = view
        .totals
        .labelled()
        .into_iter()
        .map(|(label, value)| format!("<li><strong>{}</strong>: {}</li>", text(label), text(value)))
        .collect::<String>();
    let wordcloud = view
        .wordcloud_url
        .map(|url| {
            format!(
                "<section><h2>Dataset titles</h2><img src=\"{}\" alt=\"Word cloud of dataset titles\" width=\"800\"></section>",
                escape_html(url)
            )
        })
        .unwrap_or_default();
    let body = format!(
        "<section><h2>Datasets per data repository</h2>{summary}<ul class=\"totals\">{totals}</ul></section>\
<section class=\"chart\">{}</section><section class=\"chart\">{}</section>{wordcloud}",
        view.files_chart, view.datasets_chart
    );
    page("Molecular dynamics data explorer", &body)
}

/// A grid page driven by the server-side protocol endpoint `ajax_url`.
#[must_use]
pub fn grid_page(title: &str, table_id: &str, ajax_url: &str, columns: &[(&str, &str)]) -> String {
    let head = columns
        .iter()
        .map(|(_, label)| format!("<th>{}</th>", escape_html(label)))
        .collect::<String>();
    let column_defs = columns
        .iter()
        .map(|(data, _)| format!("{{\"data\": \"{}\"}}", escape_html(data)))
        .collect::<Vec<_>>()
        .join(", ");
    let body = format!(
        "<table id=\"{id}\" class=\"display compact\"><thead><tr>{head}</tr></thead></table>\
<script>$(function() {{ $('#{id}').DataTable({{ serverSide: true, processing: true, \
ajax: '{url}', pageLength: 25, columns: [{column_defs}] }}); }});</script>",
        id = escape_html(table_id),
        url = escape_html(ajax_url),
    );
    page(title, &body)
}

#[must_use]
pub fn dataset_detail_page(detail: &DatasetDetail) -> String {
    let fields = [
        ("Data repository", text(&detail.dataset_origin)),
        ("Identifier in repository", text(&detail.id_in_origin)),
        ("Title", text(&detail.title)),
        ("Description", opt(detail.description.as_ref())),
        ("Created", opt(detail.date_created.as_ref())),
        ("Last modified", opt(detail.date_last_modified.as_ref())),
        ("Files", opt(detail.file_number.as_ref())),
        ("Downloads", opt(detail.download_number.as_ref())),
        ("Views", opt(detail.view_number.as_ref())),
        ("Authors", text(detail.authors.join(", "))),
        ("Keywords", text(detail.keywords.join(", "))),
        (
            "URL",
            link(
                detail.url.as_deref(),
                detail.url.as_deref().unwrap_or_default(),
            ),
        ),
    ];
    let items = fields
        .iter()
        .map(|(label, value)| format!("<dt>{label}</dt><dd>{value}</dd>"))
        .collect::<String>();
    let body = format!(
        "<dl class=\"dataset\">{items}</dl><p><a href=\"/datasets/{}/files\">Browse files</a></p>",
        detail.dataset_id
    );
    page(&detail.title, &body)
}

#[must_use]
pub fn dataset_files_page(
    detail: &DatasetDetail,
    totals: &DatasetFileCounts,
    analysed: &DatasetAnalysedCounts,
) -> String {
    let id = detail.dataset_id;
    let rows = [
        row(&[
            "All files".to_string(),
            text(format_thousands(totals.total_all_files)),
            String::new(),
            format!("<button hx-get=\"/datasets/{id}/files/all\" hx-target=\"#file-table\">Show</button>"),
        ]),
        row(&[
            ".gro (topology)".to_string(),
            text(format_thousands(totals.total_topology_files)),
            text(format_thousands(analysed.analysed_topology_files)),
            format!("<button hx-get=\"/datasets/{id}/files/top_files\" hx-target=\"#file-table\">Show</button>"),
        ]),
        row(&[
            ".mdp (parameters)".to_string(),
            text(format_thousands(totals.total_parameter_files)),
            text(format_thousands(analysed.analysed_parameter_files)),
            format!("<button hx-get=\"/datasets/{id}/files/param_files\" hx-target=\"#file-table\">Show</button>"),
        ]),
        row(&[
            ".xtc (trajectory)".to_string(),
            text(format_thousands(totals.total_trajectory_files)),
            text(format_thousands(analysed.analysed_trajectory_files)),
            format!("<button hx-get=\"/datasets/{id}/files/traj_files\" hx-target=\"#file-table\">Show</button>"),
        ]),
    ];
    let body = format!(
        "<p><a href=\"/datasets/{id}\">Back to dataset</a></p>{}<div id=\"file-table\"></div>",
        table(
            "file-summary",
            &["File type", "Total files", "Analysed files", ""],
            &rows
        )
    );
    page(&format!("Files of {}", detail.title), &body)
}

#[must_use]
pub fn all_files_fragment(files: &[DatasetFileRow]) -> String {
    let rows = files
        .iter()
        .map(|f| {
            row(&[
                link(f.url.as_deref(), &f.file_name),
                text(&f.file_type),
                opt(f.size_in_bytes.as_ref()),
                text(f.is_from_zip_file),
            ])
        })
        .collect::<Vec<_>>();
    table(
        "all-files",
        &["File name", "File type", "Size (bytes)", "From zip file"],
        &rows,
    )
}

#[must_use]
pub fn topology_fragment(files: &[TopologyFileRow]) -> String {
    let rows = files
        .iter()
        .map(|f| {
            row(&[
                text(&f.file_name),
                opt(f.atom_number.as_ref()),
                opt_bool(f.has_protein).to_string(),
                opt_bool(f.has_nucleic).to_string(),
                opt_bool(f.has_lipid).to_string(),
                opt_bool(f.has_glucid).to_string(),
                opt_bool(f.has_water_ion).to_string(),
            ])
        })
        .collect::<Vec<_>>();
    table(
        "topology-files",
        &[
            "File name",
            "Atoms",
            "Protein",
            "Nucleic acid",
            "Lipid",
            "Glucid",
            "Water/ion",
        ],
        &rows,
    )
}

#[must_use]
pub fn parameter_fragment(files: &[ParameterFileRow]) -> String {
    let rows = files
        .iter()
        .map(|f| {
            row(&[
                text(&f.file_name),
                opt(f.dt.as_ref()),
                opt(f.nsteps.as_ref()),
                opt(f.temperature.as_ref()),
                opt(f.thermostat_name.as_ref()),
                opt(f.barostat_name.as_ref()),
                opt(f.integrator_name.as_ref()),
            ])
        })
        .collect::<Vec<_>>();
    table(
        "parameter-files",
        &[
            "File name",
            "dt (ps)",
            "Steps",
            "Temperature (K)",
            "Thermostat",
            "Barostat",
            "Integrator",
        ],
        &rows,
    )
}

#[must_use]
pub fn trajectory_fragment(files: &[TrajectoryFileRow]) -> String {
    let rows = files
        .iter()
        .map(|f| {
            row(&[
                text(&f.file_name),
                opt(f.atom_number.as_ref()),
                opt(f.frame_number.as_ref()),
            ])
        })
        .collect::<Vec<_>>();
    table(
        "trajectory-files",
        &["File name", "Atoms", "Frames"],
        &rows,
    )
}

#[must_use]
pub fn file_types_page(stats: &[FileTypeStatsRow]) -> String {
    let rows = stats
        .iter()
        .map(|s| {
            let cell_id = dom_id("download", &s.file_type);
            let kind = FileKind::from_type_name(&s.file_type);
            // Analysed kinds have their own grid page.
            let name = match kind.detail_table() {
                Some(_) => format!("<a href=\"/{kind}_files\">{}</a>", text(&s.file_type)),
                None => text(&s.file_type),
            };
            row(&[
                name,
                text(format_thousands(s.number_of_files)),
                text(format_thousands(s.number_of_datasets)),
                text(format_gigabytes(s.total_size_in_gb)),
                format!(
                    "<span id=\"{cell_id}\"><button hx-get=\"/file_types/{}/download_info\" hx-target=\"#{cell_id}\">Files list</button></span>",
                    urlencoding::encode(&s.file_type)
                ),
            ])
        })
        .collect::<Vec<_>>();
    let body = table(
        "file-types",
        &[
            "File type",
            "Number of files",
            "Number of datasets",
            "Total size (GB)",
            "",
        ],
        &rows,
    );
    page("File types", &body)
}

#[must_use]
pub fn download_info_fragment(file_type: &str, number_of_files: usize) -> String {
    format!(
        "<a class=\"button\" href=\"/file_types/{path}/download_list/\" download>Download the list of {n} .{ft} files (TSV)</a>",
        path = urlencoding::encode(file_type),
        ft = escape_html(file_type),
        n = format_thousands(number_of_files as u64),
    )
}
