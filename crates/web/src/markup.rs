//! Markup for the URL modal and the cloud-provider menu item.

use jbs::ControlIds;

/// Icon shown next to the cloud menu entry.
pub const CLOUD_ICON_SRC: &str = "./img/dropbox-dropdown-menu-item.png";

/// Escapes a value for use inside a double-quoted attribute.
fn attr(value: &str) -> String {
	let mut out = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'"' => out.push_str("&quot;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			_ => out.push(c),
		}
	}
	out
}

/// The "Load Session from URL" modal, hidden until shown.
pub fn url_modal_html(ids: &ControlIds) -> String {
	let modal = attr(&ids.url_modal);
	let input = attr(&ids.url_input);
	let submit = attr(&ids.url_submit);
	format!(
		r#"<div id="{modal}" class="modal fade" tabindex="-1" role="dialog">
	<div class="modal-dialog modal-lg" role="document">
		<div class="modal-content">
			<div class="modal-header">
				<div class="modal-title">Load Session from URL</div>
				<button type="button" class="close" aria-label="Close">
					<span aria-hidden="true">&times;</span>
				</button>
			</div>
			<div class="modal-body">
				<div class="form-group">
					<label for="{input}">Session File URL</label>
					<input type="text" id="{input}" class="form-control" placeholder="Enter session file URL">
					<small class="form-text text-muted">Dropbox URLs are automatically converted to direct download links.</small>
				</div>
			</div>
			<div class="modal-footer">
				<button type="button" class="btn btn-secondary" data-dismiss="modal">Cancel</button>
				<button type="button" class="btn btn-primary" id="{submit}">Load Session</button>
			</div>
		</div>
	</div>
</div>"#
	)
}

/// Inner HTML of the `div.dropdown-item` that opens the cloud chooser.
pub fn cloud_item_inner_html(label: &str) -> String {
	format!(
		r#"<div class="igv-app-dropdown-item-cloud-storage">
	<div>{label} File</div>
	<div>
		<img src="{CLOUD_ICON_SRC}" width="18" height="18">
	</div>
</div>"#
	)
}

/// Selector for elements that dismiss a modal when clicked.
pub const CLOSE_SELECTOR: &str = r#".close, [data-dismiss="modal"]"#;

/// Selector for the local-file entry the cloud item is inserted after.
pub const LOCAL_FILE_ITEM_SELECTOR: &str = "label.dropdown-item";
