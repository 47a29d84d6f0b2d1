use crate::models::{DashboardView, HealthReading, MealEntry, SessionIdentity, TrendSeries};

pub fn render_dashboard(identity: &SessionIdentity, view: &DashboardView) -> String {
    let (glucose_labels, glucose_values) = series_json(&view.glucose_trend);
    let (calorie_labels, calorie_values) = series_json(&view.calorie_trend);

    DASHBOARD_HTML
        .replace("{{GLUCOSE_LABELS}}", &glucose_labels)
        .replace("{{GLUCOSE_VALUES}}", &glucose_values)
        .replace("{{CALORIE_LABELS}}", &calorie_labels)
        .replace("{{CALORIE_VALUES}}", &calorie_values)
        .replace("{{SUMMARY}}", &summary_html(view.avg_glucose, view.total_calories))
        .replace("{{HEALTH_ROWS}}", &health_rows(&view.recent_health))
        .replace("{{MEAL_ROWS}}", &meal_rows(&view.recent_meals))
        .replace("{{WELCOME}}", &escape_html(&identity.display_name()))
}

fn health_rows(rows: &[HealthReading]) -> String {
    if rows.is_empty() {
        return "<tr><td colspan=\"6\">No health data available</td></tr>".to_string();
    }

    rows.iter()
        .map(|row| {
            format!(
                "<tr><td>{id}</td><td>{level}</td><td>{time}</td><td>{activity}</td><td>{symptom}</td>\
                 <td><button class=\"action-btn edit-btn\" type=\"button\" onclick=\"editRecord({id})\">Edit</button> \
                 <button class=\"action-btn delete-btn\" type=\"button\" onclick=\"deleteRecord({id})\">Delete</button></td></tr>",
                id = row.id,
                level = row.blood_glucose_level,
                time = row.time_of_day.format("%Y-%m-%d %H:%M:%S"),
                activity = or_na(row.activity_type.as_deref()),
                symptom = or_na(row.symptom_name.as_deref()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn meal_rows(rows: &[MealEntry]) -> String {
    if rows.is_empty() {
        return "<tr><td colspan=\"6\">No meal data available</td></tr>".to_string();
    }

    rows.iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                row.id,
                escape_html(&row.meal_type),
                escape_html(&row.food_item),
                escape_html(&row.portion_size),
                row.calories,
                row.carbs,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn summary_html(avg_glucose: Option<f64>, total_calories: Option<f64>) -> String {
    let glucose = avg_glucose
        .map(|value| format!("{} mg/dL", rounded(value, 1)))
        .unwrap_or_else(|| "No data available".to_string());
    let calories = total_calories
        .map(|value| format!("{} kcal", rounded(value, 0)))
        .unwrap_or_else(|| "No data available".to_string());

    format!(
        "<p><strong>Average Blood Glucose:</strong> {glucose}</p>\n\
         <p><strong>Total Calories Consumed:</strong> {calories}</p>"
    )
}

fn series_json(series: &TrendSeries) -> (String, String) {
    (json_for_script(&series.labels), json_for_script(&series.values))
}

fn json_for_script<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

// Half away from zero after snapping to 15 significant digits, so 1.005
// rounds to 1.01 rather than following its binary value down to 1.0.
fn rounded(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    let snapped = format!("{scaled:.14e}").parse::<f64>().unwrap_or(scaled);
    snapped.round() / factor
}

fn or_na(value: Option<&str>) -> String {
    escape_html(value.unwrap_or("N/A"))
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // keeps stored text from matching a template placeholder
            '{' => out.push_str("&#123;"),
            _ => out.push(ch),
        }
    }
    out
}

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Dashboard | DialHealth</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
  <style>
    :root {
      --sidebar: #1f3b4d;
      --ink: #22303a;
      --muted: #6a7780;
      --accent: #e0565b;
      --accent-2: #3690d8;
      --card: #ffffff;
      --bg: #f2f5f7;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      display: flex;
      min-height: 100vh;
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      color: var(--ink);
      background: var(--bg);
    }

    .sidebar {
      width: 240px;
      flex-shrink: 0;
      background: var(--sidebar);
      color: white;
      padding: 28px 20px;
      display: flex;
      flex-direction: column;
      gap: 18px;
    }

    .sidebar h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    .nav-header {
      font-size: 0.75rem;
      letter-spacing: 0.14em;
      opacity: 0.7;
    }

    .nav-links {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 6px;
    }

    .nav-links a {
      display: block;
      padding: 10px 12px;
      border-radius: 8px;
      color: white;
      text-decoration: none;
    }

    .nav-links a.active,
    .nav-links a:hover {
      background: rgba(255, 255, 255, 0.14);
    }

    .sidebar .footer {
      margin-top: auto;
      font-size: 0.8rem;
      opacity: 0.7;
    }

    .main-content {
      flex: 1;
      padding: 32px;
      display: grid;
      gap: 24px;
      align-content: start;
    }

    .description-block,
    section {
      background: var(--card);
      border-radius: 12px;
      padding: 20px 24px;
      box-shadow: 0 6px 18px rgba(31, 59, 77, 0.08);
    }

    .graphs-container {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 20px;
    }

    .graph-title {
      font-weight: 600;
      margin-bottom: 8px;
    }

    .diet-table {
      width: 100%;
      border-collapse: collapse;
    }

    .diet-table th,
    .diet-table td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid #e3e8eb;
    }

    .action-btn {
      border: none;
      border-radius: 6px;
      padding: 6px 10px;
      color: white;
      cursor: pointer;
    }

    .edit-btn {
      background: var(--accent-2);
    }

    .delete-btn {
      background: var(--accent);
    }

    .button-center {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      justify-content: center;
    }

    .submit-btn {
      background: var(--sidebar);
      color: white;
      padding: 12px 18px;
      border-radius: 8px;
      text-decoration: none;
    }
  </style>
</head>
<body>
  <div class="sidebar">
    <h1>DialHealth</h1>
    <div class="nav-header">MAIN NAVIGATION</div>
    <ul class="nav-links">
      <li><a href="/" class="active">Dashboard</a></li>
      <li><a href="healthdata.php">Health Data Input</a></li>
      <li><a href="ai_analysis.php">AI Analysis</a></li>
      <li><a href="meal.php">Meal</a></li>
      <li><a href="educational.php">Education</a></li>
      <li><a href="index.php">Logout</a></li>
    </ul>
    <div class="footer">
      DialHealth AI Guide<br />
      Your Personal Health Companion
    </div>
  </div>

  <div class="main-content">
    <div class="description-block">
      <strong>Welcome {{WELCOME}}!</strong>
      View a summary of your health and meal data, and monitor your progress.
    </div>

    <h1>Your Health Dashboard</h1>

    <section id="graphs-section">
      <h2>Health Trends</h2>
      <div class="graphs-container">
        <div class="graph-wrapper">
          <div class="graph-title">Blood Glucose Trends (Last 7 Readings)</div>
          <canvas id="glucoseChart"></canvas>
        </div>
        <div class="graph-wrapper">
          <div class="graph-title">Recent Calorie Intake (Last 7 Entries)</div>
          <canvas id="calorieChart"></canvas>
        </div>
      </div>
    </section>

    <section id="health-data-section">
      <h2>Your Recent Health Data</h2>
      <p><strong>Note:</strong> Showing latest 5 entries.</p>
      <table class="diet-table">
        <thead>
          <tr>
            <th>ID</th>
            <th>Blood Glucose (mg/dL)</th>
            <th>Time of Day</th>
            <th>Activity Type</th>
            <th>Symptom Name</th>
            <th>Actions</th>
          </tr>
        </thead>
        <tbody>
{{HEALTH_ROWS}}
        </tbody>
      </table>
    </section>

    <section id="meal-data-section">
      <h2>Your Recent Meal Data</h2>
      <p><strong>Note:</strong> Showing latest 5 entries.</p>
      <table class="diet-table">
        <thead>
          <tr>
            <th>ID</th>
            <th>Meal Type</th>
            <th>Food Item</th>
            <th>Portion Size</th>
            <th>Calories</th>
            <th>Carbs (g)</th>
          </tr>
        </thead>
        <tbody>
{{MEAL_ROWS}}
        </tbody>
      </table>
    </section>

    <section id="summary-section">
      <h2>Health &amp; Meal Summary</h2>
      <div id="summary-content">
{{SUMMARY}}
        <p>Track more data to get personalized insights!</p>
      </div>
    </section>

    <section id="quick-actions">
      <h2>Quick Actions</h2>
      <div class="button-center">
        <a href="healthdata.php" class="submit-btn">Add New Health Data</a>
        <a href="meal.php" class="submit-btn">Add New Meal Data</a>
        <a href="ai_analysis.php" class="submit-btn">Analyze My Health</a>
      </div>
    </section>
  </div>

  <script>
    const glucoseLabels = {{GLUCOSE_LABELS}};
    const glucoseValues = {{GLUCOSE_VALUES}};
    const calorieLabels = {{CALORIE_LABELS}};
    const calorieValues = {{CALORIE_VALUES}};

    const withUnit = (unit) => (context) => `${context.dataset.label}: ${context.raw} ${unit}`;

    document.addEventListener('DOMContentLoaded', () => {
      new Chart(document.getElementById('glucoseChart').getContext('2d'), {
        type: 'line',
        data: {
          labels: glucoseLabels,
          datasets: [{
            label: 'Blood Glucose (mg/dL)',
            data: glucoseValues,
            borderColor: 'rgb(255, 99, 132)',
            backgroundColor: 'rgba(255, 99, 132, 0.1)',
            borderWidth: 2,
            tension: 0.1,
            fill: true
          }]
        },
        options: {
          responsive: true,
          plugins: {
            legend: { position: 'top' },
            tooltip: { callbacks: { label: withUnit('mg/dL') } }
          },
          scales: {
            y: { beginAtZero: false, title: { display: true, text: 'mg/dL' } }
          }
        }
      });

      new Chart(document.getElementById('calorieChart').getContext('2d'), {
        type: 'bar',
        data: {
          labels: calorieLabels,
          datasets: [{
            label: 'Calories',
            data: calorieValues,
            backgroundColor: 'rgba(54, 162, 235, 0.6)',
            borderColor: 'rgba(54, 162, 235, 1)',
            borderWidth: 1
          }]
        },
        options: {
          responsive: true,
          plugins: {
            legend: { position: 'top' },
            tooltip: { callbacks: { label: withUnit('kcal') } }
          },
          scales: {
            y: { beginAtZero: true, title: { display: true, text: 'Calories' } }
          }
        }
      });
    });

    function editRecord(id) {
      window.location.href = 'edit_health_data.php?id=' + id;
    }

    function deleteRecord(id) {
      if (confirm('Are you sure you want to delete this record?')) {
        window.location.href = 'delete_health_data.php?id=' + id;
      }
    }
  </script>
</body>
</html>
"#;
