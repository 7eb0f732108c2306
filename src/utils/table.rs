/// Plain-text table for the terminal price list
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            col_widths: headers.iter().map(|h| h.chars().count()).collect(),
        }
    }

    /// Add a row; cells beyond the header count are dropped
    pub fn add_row(&mut self, row: Vec<String>) {
        let row: Vec<String> = row.into_iter().take(self.headers.len()).collect();

        for (i, cell) in row.iter().enumerate() {
            self.col_widths[i] = self.col_widths[i].max(cell.chars().count());
        }

        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());

        for row in &self.rows {
            output.push('\n');
            output.push_str(&self.render_row(row));
        }

        output
    }

    fn render_row(&self, row: &[String]) -> String {
        let cells: Vec<String> = row
            .iter()
            .zip(&self.col_widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect();
        cells.join(" | ").trim_end().to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_table_layout() {
        let mut table = Table::new(&["Time", "Price"]);
        table.add_row(vec!["10:15 AM".to_string(), "RM 180.10".to_string()]);
        table.add_row(vec!["Yesterday, 11:15 AM".to_string(), "RM 179.95".to_string()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Time                | Price");
        assert_eq!(lines[1], "--------------------+----------");
        assert_eq!(lines[2], "10:15 AM            | RM 180.10");
        assert_eq!(lines[3], "Yesterday, 11:15 AM | RM 179.95");
    }

    #[test]
    fn test_extra_cells_dropped() {
        let mut table = Table::new(&["A"]);
        table.add_row(vec!["1".to_string(), "2".to_string()]);
        assert_eq!(table.render(), "A\n-\n1");
    }
}
