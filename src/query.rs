use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 10_000;

/// Raw query string for the offset-range listing. Values arrive as
/// strings so that non-integer input is reported through the normal
/// error envelope rather than a deserializer rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Range {
    pub offset: i64,
    pub limit: Option<i64>,
}

impl RangeQuery {
    pub fn validate(&self) -> Result<Range, AppError> {
        let start = parse_integer("start", self.start.as_deref())?.unwrap_or(0);

        if start < 0 {
            return Err(
                AppError::InvalidParameter("start must be a non-negative integer".to_string())
            );
        }

        let end = parse_integer("end", self.end.as_deref())?;

        if let Some(end) = end {
            if end <= start {
                return Err(
                    AppError::InvalidParameter("end must be strictly greater than start".to_string())
                );
            }
        }

        Ok(Range {
            offset: start,
            limit: end.map(|end| end - start),
        })
    }
}

/// Raw query string for the search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug)]
pub struct SearchParams {
    pub q: String,
    pub page: i64,
    pub per_page: i64,
    pub sort: SortField,
    pub order: SortOrder,
}

impl SearchQuery {
    pub fn validate(&self) -> Result<SearchParams, AppError> {
        let page = parse_page("page", self.page.as_deref())?;
        let per_page = match self.per_page.as_deref() {
            Some(_) => parse_page("per_page", self.per_page.as_deref())?,
            None => DEFAULT_PER_PAGE,
        };

        let sort = match self.sort_by.as_deref() {
            Some(name) =>
                SortField::from_name(name).ok_or_else(|| {
                    AppError::InvalidParameter(format!("sort_by does not accept '{}'", name))
                })?,
            None => SortField::Id,
        };

        let order = match self.order.as_deref() {
            Some(value) =>
                SortOrder::from_name(value).ok_or_else(|| {
                    AppError::InvalidParameter("order must be 'asc' or 'desc'".to_string())
                })?,
            None => SortOrder::Asc,
        };

        Ok(SearchParams {
            q: self.q.clone().unwrap_or_default(),
            page,
            per_page,
            sort,
            order,
        })
    }
}

impl SearchParams {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// Raw query string for the unfiltered paginated listing.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub per_page: i64,
}

impl PageQuery {
    pub fn validate(&self) -> Result<PageParams, AppError> {
        let page = parse_page("page", self.page.as_deref())?;
        let per_page = match self.per_page.as_deref() {
            Some(_) => parse_page("per_page", self.per_page.as_deref())?.min(MAX_PER_PAGE),
            None => DEFAULT_PER_PAGE,
        };

        Ok(PageParams { page, per_page })
    }
}

impl PageParams {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// Closed set of sortable entity fields. Sort columns come from this
/// mapping only, never from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    ProductName,
    Carbohydrates100g,
    ServingSize,
    ServingQuantity,
    Countries,
    ImageNutritionUrl,
}

impl SortField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "product_name" => Some(Self::ProductName),
            "carbohydrates_100g" => Some(Self::Carbohydrates100g),
            "serving_size" => Some(Self::ServingSize),
            "serving_quantity" => Some(Self::ServingQuantity),
            "countries" => Some(Self::Countries),
            "image_nutrition_url" => Some(Self::ImageNutritionUrl),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ProductName => "product_name",
            Self::Carbohydrates100g => "carbohydrates_100g",
            Self::ServingSize => "serving_size",
            Self::ServingQuantity => "serving_quantity",
            Self::Countries => "countries",
            Self::ImageNutritionUrl => "image_nutrition_url",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

fn parse_integer(name: &str, raw: Option<&str>) -> Result<Option<i64>, AppError> {
    raw.map(|value| {
        value
            .parse::<i64>()
            .map_err(|_| AppError::InvalidParameter(format!("{} must be an integer", name)))
    }).transpose()
}

fn parse_page(name: &str, raw: Option<&str>) -> Result<i64, AppError> {
    let value = parse_integer(name, raw)?.unwrap_or(1);

    if value < 1 {
        return Err(AppError::InvalidParameter(format!("{} must be a positive integer", name)));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: Option<&str>, end: Option<&str>) -> RangeQuery {
        RangeQuery {
            start: start.map(str::to_string),
            end: end.map(str::to_string),
        }
    }

    fn is_invalid<T>(result: Result<T, AppError>) -> bool {
        matches!(result, Err(AppError::InvalidParameter(_)))
    }

    #[test]
    fn range_defaults_to_full_listing() {
        let validated = range(None, None).validate().unwrap();
        assert_eq!(validated, Range { offset: 0, limit: None });
    }

    #[test]
    fn range_computes_offset_and_limit() {
        let validated = range(Some("5"), Some("12")).validate().unwrap();
        assert_eq!(validated, Range { offset: 5, limit: Some(7) });
    }

    #[test]
    fn range_without_end_keeps_offset_only() {
        let validated = range(Some("30"), None).validate().unwrap();
        assert_eq!(validated, Range { offset: 30, limit: None });
    }

    #[test]
    fn negative_start_is_rejected() {
        assert!(is_invalid(range(Some("-1"), None).validate()));
    }

    #[test]
    fn non_integer_start_is_rejected() {
        assert!(is_invalid(range(Some("abc"), None).validate()));
        assert!(is_invalid(range(Some("1.5"), None).validate()));
    }

    #[test]
    fn non_integer_end_is_rejected() {
        assert!(is_invalid(range(Some("0"), Some("ten")).validate()));
    }

    #[test]
    fn end_must_exceed_start() {
        assert!(is_invalid(range(Some("10"), Some("10")).validate()));
        assert!(is_invalid(range(Some("10"), Some("3")).validate()));
    }

    fn search(
        q: Option<&str>,
        page: Option<&str>,
        per_page: Option<&str>,
        sort_by: Option<&str>,
        order: Option<&str>
    ) -> SearchQuery {
        SearchQuery {
            q: q.map(str::to_string),
            page: page.map(str::to_string),
            per_page: per_page.map(str::to_string),
            sort_by: sort_by.map(str::to_string),
            order: order.map(str::to_string),
        }
    }

    #[test]
    fn search_defaults() {
        let params = search(Some("bread"), None, None, None, None).validate().unwrap();
        assert_eq!(params.q, "bread");
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, DEFAULT_PER_PAGE);
        assert_eq!(params.sort, SortField::Id);
        assert_eq!(params.order, SortOrder::Asc);
    }

    #[test]
    fn search_page_must_be_positive() {
        assert!(is_invalid(search(Some("a"), Some("0"), None, None, None).validate()));
        assert!(is_invalid(search(Some("a"), Some("-2"), None, None, None).validate()));
        assert!(is_invalid(search(Some("a"), Some("two"), None, None, None).validate()));
    }

    #[test]
    fn search_per_page_must_be_positive() {
        assert!(is_invalid(search(Some("a"), None, Some("0"), None, None).validate()));
        assert!(is_invalid(search(Some("a"), None, Some("x"), None, None).validate()));
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        assert!(is_invalid(search(Some("a"), None, None, Some("password"), None).validate()));
    }

    #[test]
    fn every_entity_field_is_sortable() {
        for name in [
            "id",
            "product_name",
            "carbohydrates_100g",
            "serving_size",
            "serving_quantity",
            "countries",
            "image_nutrition_url",
        ] {
            let params = search(Some("a"), None, None, Some(name), None).validate().unwrap();
            assert_eq!(params.sort.column(), name);
        }
    }

    #[test]
    fn order_accepts_only_asc_and_desc() {
        let asc = search(Some("a"), None, None, None, Some("asc")).validate().unwrap();
        assert_eq!(asc.order, SortOrder::Asc);

        let desc = search(Some("a"), None, None, None, Some("desc")).validate().unwrap();
        assert_eq!(desc.order, SortOrder::Desc);

        assert!(is_invalid(search(Some("a"), None, None, None, Some("sideways")).validate()));
        assert!(is_invalid(search(Some("a"), None, None, None, Some("ASC")).validate()));
    }

    #[test]
    fn search_offset_math() {
        let params = search(Some("a"), Some("3"), Some("10"), None, None).validate().unwrap();
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn missing_q_validates_to_empty_string() {
        let params = search(None, None, None, None, None).validate().unwrap();
        assert!(params.q.is_empty());
    }

    fn page_query(page: Option<&str>, per_page: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_string),
            per_page: per_page.map(str::to_string),
        }
    }

    #[test]
    fn page_query_defaults() {
        let params = page_query(None, None).validate().unwrap();
        assert_eq!(params, PageParams { page: 1, per_page: DEFAULT_PER_PAGE });
    }

    #[test]
    fn per_page_is_clamped_to_cap() {
        let params = page_query(Some("1"), Some("999999")).validate().unwrap();
        assert_eq!(params.per_page, MAX_PER_PAGE);
    }

    #[test]
    fn per_page_below_cap_is_kept() {
        let params = page_query(Some("2"), Some("50")).validate().unwrap();
        assert_eq!(params, PageParams { page: 2, per_page: 50 });
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn page_query_rejects_non_positive_values() {
        assert!(is_invalid(page_query(Some("0"), None).validate()));
        assert!(is_invalid(page_query(None, Some("0")).validate()));
        assert!(is_invalid(page_query(Some("x"), None).validate()));
    }
}
