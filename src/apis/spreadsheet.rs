use crate::config::SpreadsheetConfig;
use crate::error::{FinderError, Result};
use crate::infra::http_client::HttpClient;
use crate::types::{ArtistSource, RawRecord, SourceKind};
use reqwest::header::AUTHORIZATION;
use reqwest::Url;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

/// Parameters of a table select. Unset fields are left to the provider's defaults.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    pub max_records: Option<u32>,
    pub page_size: Option<u32>,
    pub view: Option<String>,
    pub filter_by_formula: Option<String>,
}

impl SelectQuery {
    /// Formula matching rows whose `id` column equals `id`.
    pub fn by_id(id: &str) -> Self {
        let escaped = id.replace('\\', "\\\\").replace('"', "\\\"");
        Self {
            filter_by_formula: Some(format!("id=\"{}\"", escaped)),
            ..Self::default()
        }
    }
}

/// One provider page: records plus the continuation token, if any
#[derive(Debug)]
struct Page {
    records: Vec<RawRecord>,
    offset: Option<String>,
}

/// Spreadsheet-table adapter over the provider's REST API
pub struct SpreadsheetAdapter {
    http: HttpClient,
    endpoint: String,
    api_key: Option<String>,
    base_id: Option<String>,
    table: String,
    view: Option<String>,
    page_size: u32,
}

impl SpreadsheetAdapter {
    pub fn new(http: HttpClient, config: &SpreadsheetConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            base_id: config.base_id.clone(),
            table: config.artist_table.clone(),
            view: config.view.clone(),
            page_size: config.page_size.max(1),
        }
    }

    /// Start a lazy select over the configured table. Nothing is fetched
    /// until the first [`RecordPager::next_page`].
    pub fn select(&self, query: SelectQuery) -> RecordPager<'_> {
        RecordPager {
            adapter: self,
            query,
            state: PagerState::Start,
            fetched: 0,
        }
    }

    fn table_url(&self) -> Result<Url> {
        let base_id = self.base_id.as_deref().ok_or_else(|| {
            FinderError::ConfigurationMissing("spreadsheet base id (AIRTABLE_BASE_KEY)".into())
        })?;
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| FinderError::Config(format!("Invalid spreadsheet endpoint '{}': {}", self.endpoint, e)))?;
        url.path_segments_mut()
            .map_err(|_| FinderError::Config(format!("Spreadsheet endpoint '{}' cannot be a base", self.endpoint)))?
            .pop_if_empty()
            .push(base_id)
            .push(&self.table);
        Ok(url)
    }

    async fn fetch_page(&self, query: &SelectQuery, offset: Option<&str>) -> Result<Page> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            FinderError::ConfigurationMissing("spreadsheet api key (AIRTABLE_API_KEY)".into())
        })?;
        let url = self.table_url()?;

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(max) = query.max_records {
            params.push(("maxRecords", max.to_string()));
        }
        if let Some(size) = query.page_size {
            params.push(("pageSize", size.to_string()));
        }
        if let Some(view) = query.view.as_ref().or(self.view.as_ref()) {
            params.push(("view", view.clone()));
        }
        if let Some(formula) = &query.filter_by_formula {
            params.push(("filterByFormula", formula.clone()));
        }
        if let Some(offset) = offset {
            params.push(("offset", offset.to_string()));
        }

        let request = self
            .http
            .get(url.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .query(&params);
        let body = self.http.get_json(SourceKind::Spreadsheet, request).await?;
        parse_page(body)
    }
}

fn parse_page(mut body: Value) -> Result<Page> {
    let records = match body.get_mut("records").map(Value::take) {
        Some(Value::Array(records)) => records,
        _ => {
            return Err(FinderError::malformed(
                SourceKind::Spreadsheet,
                "expected a 'records' array",
            ))
        }
    };
    let offset = body
        .get("offset")
        .and_then(Value::as_str)
        .filter(|o| !o.is_empty())
        .map(str::to_string);

    let records = records
        .into_iter()
        .map(minify_record)
        .collect::<Result<Vec<_>>>()?;
    Ok(Page { records, offset })
}

/// Flatten a provider row `{id, fields: {...}}` into `{recordId, ...fields}`.
pub fn minify_record(record: Value) -> Result<RawRecord> {
    let Value::Object(mut row) = record else {
        return Err(FinderError::malformed(SourceKind::Spreadsheet, "row is not an object"));
    };
    let mut flat = match row.remove("fields") {
        Some(Value::Object(fields)) => fields,
        None | Some(Value::Null) => Map::new(),
        Some(_) => {
            return Err(FinderError::malformed(
                SourceKind::Spreadsheet,
                "row 'fields' is not an object",
            ))
        }
    };
    if let Some(record_id) = row.remove("id") {
        flat.insert("recordId".to_string(), record_id);
    }
    Ok(Value::Object(flat))
}

enum PagerState {
    Start,
    Next(String),
    Done,
}

/// Lazy, finite sequence of pages from one select.
///
/// Pages are fetched one request at a time as the caller asks for them, so a
/// caller can stop early without paying for the rest of the table. A failed
/// request ends the sequence; [`restart`](Self::restart) begins again from
/// the first page.
pub struct RecordPager<'a> {
    adapter: &'a SpreadsheetAdapter,
    query: SelectQuery,
    state: PagerState,
    fetched: usize,
}

impl RecordPager<'_> {
    /// Next page of records, `Ok(None)` once the select is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<RawRecord>>> {
        let offset = match &self.state {
            PagerState::Done => return Ok(None),
            PagerState::Start => None,
            PagerState::Next(offset) => Some(offset.clone()),
        };

        let page = match self.adapter.fetch_page(&self.query, offset.as_deref()).await {
            Ok(page) => page,
            Err(e) => {
                self.state = PagerState::Done;
                return Err(e);
            }
        };

        let mut records = page.records;
        if let Some(max) = self.query.max_records {
            records.truncate((max as usize).saturating_sub(self.fetched));
        }
        self.fetched += records.len();

        let capped = self
            .query
            .max_records
            .map_or(false, |max| self.fetched >= max as usize);
        self.state = match page.offset {
            Some(next) if !capped => PagerState::Next(next),
            _ => PagerState::Done,
        };

        if records.is_empty() {
            self.state = PagerState::Done;
            return Ok(None);
        }
        debug!(records = records.len(), total = self.fetched, "fetched spreadsheet page");
        Ok(Some(records))
    }

    /// Rewind to the first page.
    pub fn restart(&mut self) {
        self.state = PagerState::Start;
        self.fetched = 0;
    }

    /// Collect every remaining page. Any failed page fails the whole drain;
    /// records from earlier pages are discarded rather than returned partially.
    pub async fn drain(mut self) -> Result<Vec<RawRecord>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            all.extend(page);
        }
        Ok(all)
    }
}

#[async_trait::async_trait]
impl ArtistSource for SpreadsheetAdapter {
    fn source_kind(&self) -> SourceKind {
        SourceKind::Spreadsheet
    }

    #[instrument(skip(self))]
    async fn fetch_artists(&self, page: Option<u32>) -> Result<Vec<RawRecord>> {
        let wanted = page.unwrap_or(1).max(1);
        let mut pager = self.select(SelectQuery {
            page_size: Some(self.page_size),
            ..SelectQuery::default()
        });

        let mut current = 0;
        while let Some(records) = pager.next_page().await? {
            current += 1;
            if current == wanted {
                info!("Fetched {} artists from spreadsheet page {}", records.len(), wanted);
                return Ok(records);
            }
        }
        info!("Spreadsheet has fewer than {} pages", wanted);
        Ok(Vec::new())
    }

    #[instrument(skip(self))]
    async fn fetch_artist(&self, id: &str) -> Result<Option<RawRecord>> {
        let mut pager = self.select(SelectQuery {
            max_records: Some(1),
            ..SelectQuery::by_id(id)
        });
        Ok(pager
            .next_page()
            .await?
            .and_then(|records| records.into_iter().next()))
    }
}
