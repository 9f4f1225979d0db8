// Read-only dashboard page. It polls the JSON endpoints every five seconds.

pub const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Blipp Game Dashboard</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 0; padding: 20px; background: #f0f0f0; }
        .container { max-width: 1200px; margin: 0 auto; }
        .card { background: #fff; border-radius: 8px; padding: 20px; margin-bottom: 20px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        h1, h2 { color: #333; }
        table { width: 100%; border-collapse: collapse; }
        th, td { text-align: left; padding: 8px; border-bottom: 1px solid #ddd; }
        th { background: #f2f2f2; }
        .stat-box { display: inline-block; min-width: 120px; text-align: center; background: #007bff; color: #fff; padding: 15px; margin: 10px; border-radius: 5px; }
        .stat-box h3 { margin: 0; font-size: 24px; }
        .stat-box p { margin: 5px 0 0 0; }
        .swatch { display: inline-block; width: 20px; height: 20px; border-radius: 3px; }
        #server-line { color: #666; font-size: 13px; }
    </style>
</head>
<body>
<div class="container">
    <h1>Blipp Game Dashboard</h1>
    <p id="server-line">Connecting...</p>

    <div class="card">
        <h2>Robot Status</h2>
        <div id="robot-status">Loading...</div>
    </div>

    <div class="card">
        <h2>Inventory Statistics</h2>
        <div id="stat-boxes"></div>
    </div>

    <div class="card">
        <h2>Recent Items</h2>
        <table id="items-table">
            <thead>
                <tr><th>ID</th><th>Name</th><th>Type</th><th>Prefix</th><th>Rarity</th><th>Color</th><th>Timestamp</th></tr>
            </thead>
            <tbody><tr><td colspan="7">Loading...</td></tr></tbody>
        </table>
    </div>
</div>

<script>
    function text(value) {
        const span = document.createElement('span');
        span.textContent = value === null || value === undefined ? '' : String(value);
        return span.innerHTML;
    }

    function num(value) {
        return typeof value === 'number' ? value.toFixed(2) : '-';
    }

    function updateRobotStatus() {
        fetch('/api/robot/state')
            .then(r => r.json())
            .then(data => {
                const el = document.getElementById('robot-status');
                if (data.status === 'not_found') {
                    el.innerHTML = '<p>No robot data recorded yet</p>';
                    return;
                }
                const activity = [data.is_digging ? 'Digging' : '', data.is_jumping ? 'Jumping' : '']
                    .filter(Boolean).join(', ') || 'Idle';
                el.innerHTML = `
                    <p><strong>Position:</strong> X: ${num(data.x)}, Y: ${num(data.y)}</p>
                    <p><strong>Direction:</strong> ${data.direction > 0 ? 'Right' : 'Left'}</p>
                    <p><strong>Status:</strong> ${activity}</p>
                    <p><strong>Last Updated:</strong> ${text(data.timestamp)}</p>`;
            })
            .catch(err => console.error('Error fetching robot state:', err));
    }

    function updateInventoryStats() {
        fetch('/api/inventory/stats')
            .then(r => r.json())
            .then(data => {
                const box = (value, label) =>
                    `<div class="stat-box"><h3>${value}</h3><p>${label}</p></div>`;
                document.getElementById('stat-boxes').innerHTML =
                    box(data.total, 'Total Items') +
                    box(Object.keys(data.by_type).length, 'Item Types') +
                    box(Object.keys(data.by_prefix).length, 'Prefixes') +
                    box(Object.keys(data.by_rarity).length, 'Rarities');
            })
            .catch(err => console.error('Error fetching inventory stats:', err));
    }

    function updateItemsTable() {
        fetch('/api/inventory/items?limit=10')
            .then(r => r.json())
            .then(items => {
                const body = document.querySelector('#items-table tbody');
                if (items.length === 0) {
                    body.innerHTML = '<tr><td colspan="7">No items collected yet</td></tr>';
                    return;
                }
                body.innerHTML = items.map(item => `
                    <tr>
                        <td>${item.id}</td>
                        <td>${text(item.name)}</td>
                        <td>${text(item.type)}</td>
                        <td>${text(item.prefix)}</td>
                        <td>${text(item.rarity)}</td>
                        <td><span class="swatch" style="background-color:${text(item.color)}"></span></td>
                        <td>${text(item.timestamp)}</td>
                    </tr>`).join('');
            })
            .catch(err => console.error('Error fetching items:', err));
    }

    function updateServerLine() {
        fetch('/api/server/status')
            .then(r => r.json())
            .then(data => {
                document.getElementById('server-line').textContent =
                    `Server ${data.status}, up ${data.uptime}, ${data.request_count} requests served`;
            })
            .catch(() => {
                document.getElementById('server-line').textContent = 'Server unreachable';
            });
    }

    function refresh() {
        updateRobotStatus();
        updateInventoryStats();
        updateItemsTable();
        updateServerLine();
    }

    refresh();
    setInterval(refresh, 5000);
</script>
</body>
</html>
"##;
