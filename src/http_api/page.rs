use crate::chart::svg::escape;

const TITLE_PLACEHOLDER: &str = "__PAGE_TITLE__";

pub(super) fn render(page_title: &str) -> String {
    PAGE.replace(TITLE_PLACEHOLDER, &escape(page_title))
}

const PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>__PAGE_TITLE__</title>
<style>
  body { margin: 0; font-family: Arial, sans-serif; color: #3C4E66; }
  .layout { display: flex; flex-direction: row; border: 0; }
  .sidebar {
    width: 20%; padding: 20px; background: #EFEFEF; height: 100vh; overflow-y: auto;
    box-shadow: 2px 2px 10px rgba(0, 0, 0, 0.1); box-sizing: border-box;
  }
  .sidebar h2 { text-align: center; margin-bottom: 20px; }
  .sidebar select {
    width: 100%; border-radius: 8px; font-size: 16px; padding: 6px; background: #FFFFFF;
  }
  .sidebar button {
    width: 100%; padding: 10px; margin-top: 20px; background: #3C4E66; color: white;
    border: none; border-radius: 5px; font-family: Arial, sans-serif; cursor: pointer;
  }
  #status { margin-top: 10px; text-align: center; min-height: 1em; }
  .main {
    width: 75%; padding: 20px; background: #FFFFFF;
    box-shadow: 2px 2px 10px rgba(0, 0, 0, 0.1);
  }
  .main h1 { text-align: center; margin-bottom: 20px; }
  #viewport svg { width: 100%; height: auto; }
  #viewport .error { color: #C81D25; text-align: center; }
</style>
</head>
<body>
<div class="layout">
  <div class="sidebar">
    <h2>Select Chart</h2>
    <select id="schedule-selector"></select>
    <input id="upload-input" type="file" accept=".json,application/json" hidden>
    <button id="upload-button" type="button">Upload JSON</button>
    <button id="export-button" type="button">Export to PNG</button>
    <div id="status"></div>
  </div>
  <div class="main">
    <h1>__PAGE_TITLE__</h1>
    <div id="viewport"></div>
  </div>
</div>
<script>
const selector = document.getElementById("schedule-selector");
const viewport = document.getElementById("viewport");
const statusLine = document.getElementById("status");
const uploadInput = document.getElementById("upload-input");

async function request(url, options) {
  const response = await fetch(url, options);
  const body = await response.json();
  if (!response.ok) {
    throw new Error(body.message || response.statusText);
  }
  return body;
}

function fillSelector(entries, selected) {
  selector.replaceChildren();
  for (const entry of entries) {
    const option = document.createElement("option");
    option.value = entry.file;
    option.textContent = entry.name;
    selector.appendChild(option);
  }
  if (selected !== undefined) {
    selector.value = selected;
  }
}

function showError(message) {
  const error = document.createElement("p");
  error.className = "error";
  error.textContent = message;
  viewport.replaceChildren(error);
}

async function showChart(file) {
  if (!file) {
    viewport.replaceChildren();
    return;
  }
  try {
    const chart = await request("/api/chart?file=" + encodeURIComponent(file));
    viewport.innerHTML = chart.svg;
  } catch (err) {
    showError(err.message);
  }
}

async function loadEntries() {
  try {
    const entries = await request("/api/schedules");
    fillSelector(entries, entries.length ? entries[0].file : undefined);
    await showChart(selector.value);
  } catch (err) {
    showError(err.message);
  }
}

selector.addEventListener("change", () => showChart(selector.value));

document.getElementById("upload-button").addEventListener("click", () => uploadInput.click());

uploadInput.addEventListener("change", () => {
  const file = uploadInput.files[0];
  if (!file) {
    return;
  }
  const reader = new FileReader();
  reader.onload = async () => {
    try {
      const result = await request("/api/upload", {
        method: "POST",
        headers: { "content-type": "application/json" },
        body: JSON.stringify({ filename: file.name, contents: reader.result }),
      });
      fillSelector(result.entries, result.selected);
      await showChart(result.selected);
    } catch (err) {
      showError(err.message);
    }
    uploadInput.value = "";
  };
  reader.readAsDataURL(file);
});

document.getElementById("export-button").addEventListener("click", async () => {
  try {
    const status = await request("/api/export", {
      method: "POST",
      headers: { "content-type": "application/json" },
      body: JSON.stringify({ file: selector.value || null }),
    });
    statusLine.textContent = status.message;
  } catch (err) {
    statusLine.textContent = err.message;
  }
});

loadEntries();
</script>
</body>
</html>
"##;
