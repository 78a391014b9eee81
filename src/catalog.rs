//! The ANCINE dashboard.
//!
//! Reports over the externally provisioned schema:
//! * `Obras` (CRT, TITULO_ORIGINAL, PAIS, ANO_PRODUCAO)
//! * `Requisicao` (CRT, CNPJ_REQUERENTE, SITUACAO_CRT, DATA_REQUERIMENTO_CRT)
//! * `Requerentes` (CNPJ, MUNICIPIO, UF)
//!
//! Request dates are stored as text, so the year filter matches them with a
//! bound `LIKE`; production years are integers and match exactly.

use crate::error::Result;
use crate::filter::YEAR_FILTER;
use crate::page::{Report, ReportPage};
use crate::query::{FilterMatch, QuerySpec};
use crate::render::ReportDescriptor;

pub const IRREGULAR_REQUESTS: &str = "requisicoes_irregulares";
pub const REQUESTS_BY_CITY: &str = "requisicoes_por_municipio";
pub const REQUESTS_BY_STATE: &str = "requisicoes_por_uf";
pub const WORKS_BY_COUNTRY: &str = "obras_por_pais";
pub const WORKS_BY_YEAR: &str = "obras_por_ano";

pub fn reports() -> Vec<Report> {
    vec![
        Report::new(
            QuerySpec::new(
                IRREGULAR_REQUESTS,
                "SELECT CRT, CNPJ_REQUERENTE, SITUACAO_CRT, DATA_REQUERIMENTO_CRT FROM Requisicao",
            )
            .with_where("SITUACAO_CRT = 'IRREGULAR'")
            .filter_on(YEAR_FILTER, "DATA_REQUERIMENTO_CRT", FilterMatch::Contains)
            .order_by("DATA_REQUERIMENTO_CRT")
            .limit(50),
            ReportDescriptor::table("Requisições irregulares"),
        ),
        Report::new(
            QuerySpec::new(
                REQUESTS_BY_CITY,
                "SELECT r.MUNICIPIO AS MUNICIPIO, COUNT(*) AS TOTAL \
                 FROM Requisicao q JOIN Requerentes r ON r.CNPJ = q.CNPJ_REQUERENTE",
            )
            .filter_on(YEAR_FILTER, "q.DATA_REQUERIMENTO_CRT", FilterMatch::Contains)
            .group_by("r.MUNICIPIO"),
            ReportDescriptor::bar_chart("Municípios com mais requisições", "MUNICIPIO", "TOTAL").with_limit(10),
        ),
        Report::new(
            QuerySpec::new(
                REQUESTS_BY_STATE,
                "SELECT r.UF AS UF, COUNT(*) AS TOTAL \
                 FROM Requisicao q JOIN Requerentes r ON r.CNPJ = q.CNPJ_REQUERENTE",
            )
            .filter_on(YEAR_FILTER, "q.DATA_REQUERIMENTO_CRT", FilterMatch::Contains)
            .group_by("r.UF"),
            ReportDescriptor::bar_chart("Requisições por UF", "UF", "TOTAL").with_color_scheme("greens"),
        ),
        Report::new(
            QuerySpec::new(WORKS_BY_COUNTRY, "SELECT PAIS, COUNT(*) AS TOTAL FROM Obras")
                .filter_on(YEAR_FILTER, "ANO_PRODUCAO", FilterMatch::Equals)
                .group_by("PAIS"),
            ReportDescriptor::bar_chart("Obras por país de origem", "PAIS", "TOTAL")
                .with_limit(10)
                .with_color_scheme("oranges"),
        ),
        Report::new(
            QuerySpec::new(WORKS_BY_YEAR, "SELECT ANO_PRODUCAO AS ANO, COUNT(*) AS TOTAL FROM Obras")
                .with_where("ANO_PRODUCAO IS NOT NULL")
                .filter_on(YEAR_FILTER, "ANO_PRODUCAO", FilterMatch::Equals)
                .group_by("ANO_PRODUCAO"),
            ReportDescriptor::line_chart("Obras por ano de produção", "ANO", "TOTAL"),
        ),
    ]
}

pub fn page(title: &str) -> Result<ReportPage> {
    ReportPage::new(title, reports())
}
