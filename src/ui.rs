use crate::models::TodayResponse;

pub fn render_index(today: &TodayResponse) -> String {
    INDEX_HTML
        .replace("{{DATE}}", &today.date)
        .replace("{{GLASSES}}", &today.glasses.to_string())
        .replace("{{GOAL}}", &today.goal.to_string())
        .replace("{{MAX}}", &today.max_goal.to_string())
        .replace("{{PROGRESS}}", &today.progress_percent.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Water Tracker</title>
  <style>
    :root {
      --bg: #eaf4fb;
      --ink: #1d2b36;
      --accent: #2b8fd6;
      --accent-soft: rgba(43, 143, 214, 0.14);
      --ok: #2d7a4b;
      --card: #ffffff;
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #ffffff 70%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 28px 16px 40px;
    }

    .app {
      width: min(720px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: 0 20px 50px rgba(29, 43, 54, 0.12);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 { margin: 0; font-size: 2rem; }
    .subtitle { margin: 4px 0 0; color: #5b6b77; }

    .progress { height: 14px; border-radius: 999px; background: var(--accent-soft); overflow: hidden; }
    .progress span { display: block; height: 100%; background: var(--accent); transition: width 200ms ease; }

    .count { font-size: 2.4rem; font-weight: 600; color: var(--accent); }

    .actions, .tabs, .nav { display: flex; flex-wrap: wrap; gap: 10px; align-items: center; }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent-soft);
      color: var(--ink);
    }

    button.primary { background: var(--accent); color: white; }
    button.active { background: var(--ink); color: white; }
    button:disabled { opacity: 0.4; cursor: default; }

    .rows { list-style: none; margin: 0; padding: 0; display: grid; gap: 8px; }
    .rows li {
      display: grid;
      grid-template-columns: 1fr auto;
      padding: 10px 14px;
      border-radius: 14px;
      background: #f4f8fb;
    }
    .rows li.met { background: rgba(45, 122, 75, 0.12); }
    .rows .sub { color: #6b7a85; font-size: 0.85rem; }
    .rows .value { font-weight: 600; align-self: center; }

    .summary { display: flex; gap: 24px; color: #3c4c57; }
    .status { min-height: 1.2em; color: #5b6b77; }
    .status[data-type="error"] { color: #c63b2b; }
    .status[data-type="ok"] { color: var(--ok); }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Water Tracker</h1>
      <p class="subtitle" id="date">{{DATE}}</p>
    </header>

    <section>
      <div class="count"><span id="glasses">{{GLASSES}}</span> / <span id="goal">{{GOAL}}</span> cups</div>
      <div class="progress"><span id="progress" style="width: {{PROGRESS}}%"></span></div>
      <p class="subtitle">Daily maximum: <span id="max">{{MAX}}</span></p>
    </section>

    <section class="actions">
      <button class="primary" data-amount="1" type="button">+1 cup</button>
      <button class="primary" data-amount="2" type="button">+2 cups</button>
      <button id="reset-day" type="button">Reset today</button>
      <label>Goal <input id="goal-input" type="number" min="1" max="{{MAX}}" value="{{GOAL}}" /></label>
    </section>

    <section>
      <div class="tabs">
        <button class="active" data-period="week" type="button">Week</button>
        <button data-period="month" type="button">Month</button>
        <button data-period="year" type="button">Year</button>
      </div>
      <div class="nav">
        <button id="prev" type="button">&larr;</button>
        <span id="range"></span>
        <button id="next" type="button" disabled>&rarr;</button>
      </div>
      <ul class="rows" id="rows"></ul>
      <div class="summary">
        <span>Average: <strong id="average">0.0</strong> cups</span>
        <span>Goal met: <strong id="met">0</strong> days</span>
      </div>
    </section>

    <section class="actions">
      <a id="export" href="/api/export"><button type="button">Export</button></a>
      <label><button id="import-btn" type="button">Import</button><input id="import" type="file" accept="application/json" hidden /></label>
      <button id="clear" type="button">Clear all data</button>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    const statusEl = $('status');
    let lastVersion = 0;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const showNotices = (notices) => {
      if (notices && notices.length) {
        setStatus(notices.join(' '), 'error');
      }
    };

    const updateToday = (today) => {
      $('date').textContent = today.date;
      $('glasses').textContent = today.glasses;
      $('goal').textContent = today.goal;
      $('max').textContent = today.max_goal;
      $('progress').style.width = `${today.progress_percent}%`;
      $('goal-input').value = today.goal;
    };

    const renderView = (view) => {
      showNotices(view.notices);
      document.querySelectorAll('[data-period]').forEach((button) => {
        button.classList.toggle('active', button.dataset.period === view.period);
      });
      const frame = view.frame;
      if (frame.version === lastVersion) {
        return;
      }
      lastVersion = frame.version;
      $('rows').innerHTML = frame.rows
        .map((row) => `<li class="${row.goal_met ? 'met' : ''}"><div>${row.label}<div class="sub">${row.sub_label}</div></div><span class="value">${row.value}</span></li>`)
        .join('');
      $('range').textContent = frame.range_label;
      if (frame.summary) {
        $('average').textContent = frame.summary.average;
        $('met').textContent = frame.summary.goal_met_days;
      }
      if (frame.buttons) {
        $('prev').disabled = !frame.buttons.previous_enabled;
        $('next').disabled = !frame.buttons.next_enabled;
      }
    };

    const request = async (method, url, body) => {
      const options = { method, headers: {} };
      if (body !== undefined) {
        options.headers['content-type'] = 'application/json';
        options.body = typeof body === 'string' ? body : JSON.stringify(body);
      }
      const res = await fetch(url, options);
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.json();
    };

    const loadView = async () => renderView(await request('GET', '/api/view'));

    document.querySelectorAll('[data-amount]').forEach((button) => {
      button.addEventListener('click', async () => {
        try {
          const result = await request('POST', '/api/log', { amount: Number(button.dataset.amount) });
          updateToday(result.today);
          setStatus(result.message, result.outcome === 'already_at_max' ? '' : 'ok');
          showNotices(result.notices);
          await loadView();
        } catch (err) {
          setStatus(err.message, 'error');
        }
      });
    });

    document.querySelectorAll('[data-period]').forEach((button) => {
      button.addEventListener('click', () =>
        request('POST', '/api/period', { period: button.dataset.period })
          .then(renderView)
          .catch((err) => setStatus(err.message, 'error')));
    });

    const navigate = (direction) =>
      request('POST', '/api/navigate', { direction })
        .then(renderView)
        .catch((err) => setStatus(err.message, 'error'));
    $('prev').addEventListener('click', () => navigate(-1));
    $('next').addEventListener('click', () => navigate(1));

    $('reset-day').addEventListener('click', () =>
      request('POST', '/api/reset-day')
        .then((today) => { updateToday(today); return loadView(); })
        .catch((err) => setStatus(err.message, 'error')));

    $('goal-input').addEventListener('change', (event) =>
      request('POST', '/api/settings', { daily_goal: Number(event.target.value) })
        .then((today) => { updateToday(today); return loadView(); })
        .catch((err) => setStatus(err.message, 'error')));

    $('import-btn').addEventListener('click', () => $('import').click());
    $('import').addEventListener('change', async (event) => {
      const file = event.target.files[0];
      if (!file) {
        return;
      }
      $('import-btn').disabled = true;
      try {
        const result = await request('POST', '/api/import', await file.text());
        updateToday(result.today);
        setStatus(`Imported ${result.days} days.`, 'ok');
        showNotices(result.notices);
        await loadView();
      } catch (err) {
        setStatus(err.message, 'error');
      } finally {
        $('import-btn').disabled = false;
        event.target.value = '';
      }
    });

    $('clear').addEventListener('click', () => {
      if (!confirm('Delete all tracked data?')) {
        return;
      }
      request('POST', '/api/clear')
        .then((today) => { updateToday(today); return loadView(); })
        .catch((err) => setStatus(err.message, 'error'));
    });

    loadView().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
