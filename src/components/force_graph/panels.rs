//! HTML overlays drawn above the canvas: node details, findings, legend, the
//! analysis summary and the full findings report.
//!
//! Panel contents are built by plain functions over the model and the current
//! focus so they can be checked without a DOM.

use std::sync::Arc;

use leptos::prelude::*;

use super::interaction::Focus;
use super::model::{GraphModel, GraphSummary};
use super::theme::{TYPE_STYLES, type_style};
use super::types::{NodeType, SecurityFinding};

/// Shown when a node carries no description of its own.
pub const DEFAULT_DESCRIPTION: &str = "Logic component identified within the execution flow.";

/// Warning strip at the bottom of the detail panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
	/// The active node has an attack path on display.
	AttackPath,
	/// The active node is vulnerable but no path is shown.
	VulnerableSink,
}

impl Banner {
	/// Banner caption.
	pub fn text(self) -> &'static str {
		match self {
			Banner::AttackPath => "Displaying Full Attack Path",
			Banner::VulnerableSink => "Vulnerable Sink Detected",
		}
	}
}

/// Contents of the detail panel for the active node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDetails {
	/// Node type.
	pub kind: NodeType,
	/// Font Awesome class for `kind`.
	pub icon: &'static str,
	/// Source file badge; empty names are dropped.
	pub file: Option<String>,
	/// Display label.
	pub title: String,
	/// Node description, or `DEFAULT_DESCRIPTION`.
	pub description: String,
	/// Source excerpt, if non-empty.
	pub snippet: Option<String>,
	/// Warning strip for risky nodes.
	pub banner: Option<Banner>,
}

impl NodeDetails {
	/// Details for the active node of `focus`, or `None` when nothing is active.
	pub fn new(model: &GraphModel, focus: &Focus) -> Option<Self> {
		let active = focus.active.as_ref()?;
		let node = model.nodes.get(active.index)?;

		let banner = if focus.attack_path.is_some() {
			Some(Banner::AttackPath)
		} else if model.is_vulnerable(&node.id) {
			Some(Banner::VulnerableSink)
		} else {
			None
		};

		Some(Self {
			kind: node.kind,
			icon: type_style(node.kind).icon,
			file: node.file.clone().filter(|f| !f.is_empty()),
			title: node.display_label(),
			description: node
				.description
				.clone()
				.filter(|d| !d.trim().is_empty())
				.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
			snippet: node.snippet.clone().filter(|s| !s.is_empty()),
			banner,
		})
	}
}

/// Findings attached to the active node that carry something to act on.
pub fn active_findings(model: &GraphModel, focus: &Focus) -> Vec<SecurityFinding> {
	let Some(active) = &focus.active else {
		return Vec::new();
	};
	model
		.findings_for(&active.id)
		.iter()
		.filter(|f| f.payload_suggestion.is_some() || f.test_strategy.is_some())
		.cloned()
		.collect()
}

/// Details of the hovered or selected node.
#[component]
pub fn DetailPanel(
	/// Current graph.
	model: Memo<Arc<GraphModel>>,
	/// Current highlight state.
	focus: Memo<Focus>,
) -> impl IntoView {
	let details = Memo::new(move |_| model.with(|m| focus.with(|f| NodeDetails::new(m, f))));

	move || {
		details.get().map(|d| {
			let banner = d.banner.map(|banner| {
				view! {
					<div class="panel-banner danger">
						<i class="fas fa-skull-crossbones"></i>
						<span>{banner.text()}</span>
					</div>
				}
			});
			let snippet = d.snippet.map(|snippet| {
				view! {
					<div class="snippet">
						<h4><i class="fas fa-terminal"></i>" Source Snippet"</h4>
						<pre>{snippet}</pre>
					</div>
				}
			});
			let file = d.file.map(|file| {
				view! {
					<div class="file-badge">
						<i class="fas fa-file-code"></i>
						<span>{file}</span>
					</div>
				}
			});

			view! {
				<div class="detail-panel">
					<div class="panel-header">
						<div class="node-type">
							<i class=format!("fas {}", d.icon)></i>
							<span>{d.kind.as_str()}</span>
						</div>
						{file}
					</div>
					<div class="panel-body">
						<h3>{d.title}</h3>
						<p>{d.description}</p>
						{snippet}
					</div>
					{banner}
				</div>
			}
		})
	}
}

/// Payload suggestions and test strategies for the active node.
#[component]
pub fn FindingsPanel(
	/// Current graph.
	model: Memo<Arc<GraphModel>>,
	/// Current highlight state.
	focus: Memo<Focus>,
) -> impl IntoView {
	let findings = Memo::new(move |_| model.with(|m| focus.with(|f| active_findings(m, f))));

	move || {
		let findings = findings.get();
		(!findings.is_empty()).then(|| {
			view! {
				<div class="findings-panel">
					<div class="panel-header danger">
						<i class="fas fa-flask"></i>
						<span>"Security Sandbox"</span>
					</div>
					<div class="panel-body">
						{findings
							.into_iter()
							.map(|finding| {
								let payload = finding.payload_suggestion.map(|payload| {
									view! {
										<div class="finding-payload">
											<h4><i class="fas fa-bug"></i>" Potential Payload"</h4>
											<code>{payload}</code>
										</div>
									}
								});
								let strategy = finding.test_strategy.map(|strategy| {
									view! {
										<div class="finding-strategy">
											<h4><i class="fas fa-vial"></i>" Test Strategy"</h4>
											<p>{strategy}</p>
										</div>
									}
								});
								view! { <div class="finding">{payload}{strategy}</div> }
							})
							.collect_view()}
					</div>
				</div>
			}
		})
	}
}

/// One finding as listed in the report.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportEntry {
	/// Title, or "Observation"/"Finding" when there is none.
	pub heading: String,
	/// Finding text.
	pub description: String,
	/// Referenced node ids, shown as chips.
	pub nodes: Vec<String>,
}

/// Every finding of the payload in order, actionable or not.
pub fn report_entries(model: &GraphModel) -> Vec<ReportEntry> {
	model
		.findings
		.iter()
		.map(|finding| ReportEntry {
			heading: finding.heading().to_string(),
			description: finding.description.clone(),
			nodes: finding.nodes.clone(),
		})
		.collect()
}

/// Collapsible report of all findings with the sink and entry point lists.
#[component]
pub fn FindingsReport(
	/// Current graph.
	model: Memo<Arc<GraphModel>>,
) -> impl IntoView {
	let open = RwSignal::new(false);
	let entries = Memo::new(move |_| model.with(|m| report_entries(m)));
	let sinks = Memo::new(move |_| model.with(|m| m.sinks.clone()));
	let sources = Memo::new(move |_| model.with(|m| m.input_sources.clone()));
	let has_content = move || {
		entries.with(|e| !e.is_empty()) || sinks.with(|s| !s.is_empty()) || sources.with(|s| !s.is_empty())
	};

	let report = move || {
		view! {
			<div class="report-body">
				<section class="report-findings">
					<h4>"Vulnerabilities & Weaknesses"</h4>
					{entries
						.get()
						.into_iter()
						.map(|entry| {
							let chips = (!entry.nodes.is_empty()).then(|| {
								view! {
									<div class="report-chips">
										{entry
											.nodes
											.into_iter()
											.map(|id| view! { <span class="chip">{id}</span> })
											.collect_view()}
									</div>
								}
							});
							view! {
								<div class="report-finding">
									<h5><i class="fas fa-exclamation-circle"></i>" "{entry.heading}</h5>
									<p>{entry.description}</p>
									{chips}
								</div>
							}
						})
						.collect_view()}
				</section>
				<section class="report-sinks">
					<h4>"Dangerous Sinks"</h4>
					<div class="report-chips">
						{sinks
							.get()
							.into_iter()
							.map(|sink| view! { <span class="chip danger">{sink}</span> })
							.collect_view()}
					</div>
				</section>
				<section class="report-sources">
					<h4>"Entry Points"</h4>
					<ul>
						{sources
							.get()
							.into_iter()
							.map(|src| view! { <li><i class="fas fa-chevron-right"></i>" "{src}</li> })
							.collect_view()}
					</ul>
				</section>
			</div>
		}
	};

	view! {
		<Show when=has_content>
			<div class="findings-report">
				<button class="report-toggle" on:click=move |_| open.update(|o| *o = !*o)>
					<i class="fas fa-shield-alt"></i>
					<span>"Security Report"</span>
				</button>
				<Show when=move || open.get()>{report}</Show>
			</div>
		</Show>
	}
}

/// Node type legend, always visible.
#[component]
pub fn Legend() -> impl IntoView {
	view! {
		<div class="legend">
			<h4>"Legend"</h4>
			{TYPE_STYLES
				.iter()
				.map(|style| {
					view! {
						<div class="legend-item">
							<span class="legend-icon" style=format!("color: {}", style.color.to_css())>
								<i class=format!("fas {}", style.icon)></i>
							</span>
							<span>{style.kind.as_str()}</span>
						</div>
					}
				})
				.collect_view()}
		</div>
	}
}

/// Lines of the summary overlay; zero counts are left out.
pub fn summary_counts(summary: &GraphSummary) -> Vec<(&'static str, usize)> {
	[
		("findings", summary.findings),
		("input sources", summary.input_sources),
		("sinks", summary.sinks),
		("trust boundaries", summary.trust_boundaries),
		("critical functions", summary.critical_functions),
	]
	.into_iter()
	.filter(|&(_, count)| count > 0)
	.collect()
}

/// Analysis summary text with headline counts.
#[component]
pub fn SummaryPanel(
	/// Current graph.
	model: Memo<Arc<GraphModel>>,
) -> impl IntoView {
	let summary = Memo::new(move |_| model.with(|m| m.summary.clone()));

	move || {
		let summary = summary.get();
		let counts = summary_counts(&summary);
		(!summary.text.is_empty() || !counts.is_empty()).then(|| {
			view! {
				<div class="summary-panel">
					{(!summary.text.is_empty()).then(|| view! { <p class="summary-text">{summary.text}</p> })}
					<ul class="summary-counts">
						{counts
							.into_iter()
							.map(|(label, count)| view! { <li><strong>{count}</strong>" "{label}</li> })
							.collect_view()}
					</ul>
				</div>
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::interaction::Interaction;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};

	fn model() -> GraphModel {
		GraphModel::new(&GraphData {
			nodes: vec![
				GraphNode {
					id: "q".into(),
					label: "query param".into(),
					kind: NodeType::Input,
					..GraphNode::default()
				},
				GraphNode {
					id: "out".into(),
					label: "output element".into(),
					kind: NodeType::Dom,
					file: Some("app.js".into()),
					snippet: Some("out.innerHTML = q".into()),
					..GraphNode::default()
				},
				GraphNode {
					id: "fmt".into(),
					label: "format".into(),
					kind: NodeType::Function,
					description: Some("Formats the greeting".into()),
					..GraphNode::default()
				},
			],
			links: vec![GraphLink::new("q", "out")],
			security_findings: vec![
				SecurityFinding {
					description: "DOM XSS".into(),
					nodes: vec!["out".into()],
					payload_suggestion: Some("<img src=x onerror=alert(1)>".into()),
					test_strategy: Some("Inject via ?q=".into()),
					..SecurityFinding::default()
				},
				SecurityFinding {
					description: "noted only".into(),
					nodes: vec!["out".into()],
					..SecurityFinding::default()
				},
			],
			summary: "Reflected input reaches innerHTML.".into(),
			..GraphData::default()
		})
	}

	fn focus(model: &GraphModel, hovered: Option<&str>, selected: Option<&str>) -> Focus {
		Focus::derive(
			model,
			&Interaction {
				hovered: hovered.map(Into::into),
				selected: selected.map(Into::into),
			},
		)
	}

	#[test]
	fn no_active_node_no_details() {
		let model = model();
		assert_eq!(NodeDetails::new(&model, &focus(&model, None, None)), None);
		assert!(active_findings(&model, &focus(&model, None, None)).is_empty());
	}

	#[test]
	fn vulnerable_node_shows_attack_path_banner() {
		let model = model();
		let details = NodeDetails::new(&model, &focus(&model, Some("out"), None)).unwrap();
		assert_eq!(details.title, "<output>");
		assert_eq!(details.file.as_deref(), Some("app.js"));
		assert_eq!(details.banner, Some(Banner::AttackPath));
		assert_eq!(details.banner.map(Banner::text), Some("Displaying Full Attack Path"));
		assert_eq!(details.icon, "fa-desktop");
	}

	#[test]
	fn benign_node_uses_default_description() {
		let model = model();
		let details = NodeDetails::new(&model, &focus(&model, Some("q"), None)).unwrap();
		assert_eq!(details.description, DEFAULT_DESCRIPTION);
		assert_eq!(details.banner, None);

		let details = NodeDetails::new(&model, &focus(&model, None, Some("fmt"))).unwrap();
		assert_eq!(details.title, "format()");
		assert_eq!(details.description, "Formats the greeting");
	}

	#[test]
	fn findings_follow_the_active_node() {
		let model = model();
		let findings = active_findings(&model, &focus(&model, None, Some("out")));
		assert_eq!(findings.len(), 1);
		assert_eq!(findings[0].test_strategy.as_deref(), Some("Inject via ?q="));
		assert!(active_findings(&model, &focus(&model, Some("q"), Some("out"))).is_empty());
	}

	#[test]
	fn summary_skips_zero_counts() {
		let model = model();
		assert_eq!(model.summary.text, "Reflected input reaches innerHTML.");
		assert_eq!(summary_counts(&model.summary), vec![("findings", 2)]);
	}

	#[test]
	fn report_lists_every_finding_with_fallback_headings() {
		let mut data = GraphData {
			security_findings: vec![
				SecurityFinding {
					description: "Unescaped hash fragment".into(),
					observation: true,
					..SecurityFinding::default()
				},
				SecurityFinding {
					title: Some("DOM XSS".into()),
					description: "hash reaches innerHTML".into(),
					nodes: vec!["out".into(), "q".into()],
					..SecurityFinding::default()
				},
			],
			sinks: vec!["out".into()],
			input_sources: vec!["q".into()],
			..GraphData::default()
		};
		data.security_findings.extend(model().findings);
		let model = GraphModel::new(&data);

		let entries = report_entries(&model);
		let headings: Vec<&str> = entries.iter().map(|e| e.heading.as_str()).collect();
		assert_eq!(headings, ["Observation", "DOM XSS", "Finding", "Finding"]);
		assert!(entries[0].nodes.is_empty());
		assert_eq!(entries[1].nodes, ["out", "q"]);
		assert_eq!(entries[3].description, "noted only");
		assert_eq!(model.sinks, ["out"]);
		assert_eq!(model.input_sources, ["q"]);
	}
}
