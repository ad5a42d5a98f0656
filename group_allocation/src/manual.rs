/*!

This is the long-form manual for `group_allocation` and `prefgroups`.

## The allocation procedure

Every person states a first and a second choice among the groups `1` to `N`.
All the groups have the same maximum size. People are processed one at a time:

1. if the first choice still has room, the person joins it;
2. otherwise, if the second choice still has room, the person joins it;
3. otherwise the person joins a group drawn at random among those with room left.

By default the list is processed starting from the **last** person, so that
groups made earlier from the same list, in the same order, come out the same. The `processingOrder` option
switches to processing from the first person.

Being processed early is an advantage. For this reason `prefgroups` shuffles
the input rows before running the allocation, unless `--keep-input-order` is
passed. Use `--seed` to make a shuffled run reproducible.

The program refuses to start when there are more people than places
(`groups × maximum per group`), and when a choice is not a group number.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values
* `excel` Excel workbooks (`.xls`, `.xlsx`, `.xlsm`, `.xlsb`)
* `ods` OpenDocument spreadsheets

The format is detected from the extension of the file. It can be forced with `--input-type`.

### `csv`

Only commas are accepted as separators. Every line is a person:

```text
name,first choice,second choice
Anna,1,2
Bob,2,3
```

The header line is optional. Use `--first-data-row 2` (or `firstDataRowIndex`) to skip it.

### `excel` and `ods`

The first worksheet is read, unless a worksheet name is given with `--excel-worksheet-name`.
Choice cells may be numbers or text containing a whole number.

## Columns

Columns are designated either with the letters used by spreadsheet programs
(`A`, `B`, ..., `Z`, `AA`, ...) or with numbers starting at 1. The defaults are
`A` for the name, `B` for the first choice and `C` for the second choice.

## Output

The groups are written as a CSV table with one column per group:

```text
Group 1,Group 2,Group 3
Bob,Anna,
Clara,,
```

When the output path ends with `.json` (or is `stdout`), a JSON summary is
written instead. It lists the members of each group and how many people got
their first choice, their second choice or a random group.

## Configuration

All the options can be stored in a JSON file passed with `--config`. Command
line flags take precedence over the values of the file. Relative paths in the
file are resolved from the directory of the file.

```text
{
  "outputSettings": { "outputPath": "results.csv" },
  "inputSource": {
    "filePath": "students.xlsx",
    "excelWorksheetName": "Answers",
    "nameColumnIndex": "A",
    "firstChoiceColumnIndex": "C",
    "secondChoiceColumnIndex": "D",
    "firstDataRowIndex": 2,
    "randomizeInputOrder": true
  },
  "rules": {
    "groupsCount": 4,
    "maxPerGroup": 6,
    "randomSeed": "1234",
    "processingOrder": "lastToFirst"
  }
}
```

FileSource options (`inputSource`):
 - `filePath` (string): the input file.
 - `provider` (string, optional): `csv`, `excel` or `ods`. Detected from the extension if missing.
 - `excelWorksheetName` (string, optional): the worksheet to read.
 - `nameColumnIndex`, `firstChoiceColumnIndex`, `secondChoiceColumnIndex` (letter or number, optional).
 - `firstDataRowIndex` (number, optional): the first row containing a person, starting at 1.
 - `randomizeInputOrder` (boolean, optional, default `true`).

Rules (`rules`):
 - `groupsCount` (number): the number of groups.
 - `maxPerGroup` (number): the maximum number of people in a group.
 - `randomSeed` (string or number, optional): the seed of the random generator.
 - `processingOrder` (string, optional): `lastToFirst` (default) or `firstToLast`.

 */
