/// Columns the entry list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Name,
    StartDate,
    EndDate,
    Vendor,
}

impl SortColumn {
    /// Parse the `sortBy` query value. Unknown columns fall back to `Name`.
    pub fn from_param(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "start_date" | "introduced" => SortColumn::StartDate,
            "end_date" | "discontinued" => SortColumn::EndDate,
            "vendor" | "company" | "vendor.name" | "company.name" => SortColumn::Vendor,
            _ => SortColumn::Name,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::StartDate => "start_date",
            SortColumn::EndDate => "end_date",
            SortColumn::Vendor => "vendor",
        }
    }

    /// SQL expression used in ORDER BY (whitelisted, never user text).
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortColumn::Name => "e.name COLLATE NOCASE",
            SortColumn::StartDate => "e.start_date",
            SortColumn::EndDate => "e.end_date",
            SortColumn::Vendor => "v.name COLLATE NOCASE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse the `order` query value. Anything but "desc" is ascending.
    pub fn from_param(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}
